use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error)]
#[error("completion was dropped before it resolved")]
pub struct CompletionDropped;

/// A one-shot completion handle: exactly one resolution, observable from
/// many places without consuming it. Used to signal "publish accepted" or
/// "subscription closed" back to a caller awaiting the outcome of a request
/// it already queued.
pub struct Completion<T> {
    resolved: Arc<AtomicBool>,
    rx: Option<oneshot::Receiver<T>>,
}

pub struct CompletionHandle<T> {
    resolved: Arc<AtomicBool>,
    tx: oneshot::Sender<T>,
}

impl<T> CompletionHandle<T> {
    pub fn resolve(self, value: T) {
        self.resolved.store(true, Ordering::SeqCst);
        let _ = self.tx.send(value);
    }
}

impl<T> Completion<T> {
    pub fn new() -> (Completion<T>, CompletionHandle<T>) {
        let (tx, rx) = oneshot::channel();
        let resolved = Arc::new(AtomicBool::new(false));
        (
            Completion { resolved: resolved.clone(), rx: Some(rx) },
            CompletionHandle { resolved, tx },
        )
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }

    pub async fn wait(mut self) -> Result<T, CompletionDropped> {
        self.rx.take().expect("wait called once").await.map_err(|_| CompletionDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_exactly_once() {
        let (completion, handle) = Completion::new();
        assert!(!completion.is_resolved());
        handle.resolve("ok");
        let value = completion.wait().await.unwrap();
        assert_eq!(value, "ok");
    }

    #[tokio::test]
    async fn dropped_handle_reports_as_dropped() {
        let (completion, handle) = Completion::<u32>::new();
        drop(handle);
        assert!(completion.wait().await.is_err());
    }
}
