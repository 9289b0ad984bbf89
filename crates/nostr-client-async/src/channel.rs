use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
#[error("channel closed")]
pub struct ChannelClosed;

/// The real `tokio` sender, shared behind a lock so any clone of `Sender`
/// can close the channel for every other clone and for the paired
/// `Receiver` — not just the clone that happened to create it.
struct Shared<T> {
    tx: Mutex<Option<mpsc::UnboundedSender<T>>>,
}

/// An unbounded FIFO channel, the native-runtime counterpart to the
/// teacher's WASM `futures::channel::mpsc` bounded queue: connection
/// internals enqueue outgoing frames and incoming listener callbacks onto
/// this without ever blocking the caller.
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<T> Sender<T> {
    pub fn send(&self, value: T) -> Result<(), ChannelClosed> {
        match self.shared.tx.lock().unwrap().as_ref() {
            Some(tx) => tx.send(value).map_err(|_| ChannelClosed),
            None => Err(ChannelClosed),
        }
    }

    /// Idempotent. Drops the underlying sender, which wakes the paired
    /// `Receiver`: already-queued items are still delivered in order, and
    /// `recv()` returns `None` once they're drained.
    pub fn close(&self) {
        self.shared.tx.lock().unwrap().take();
    }
}

pub struct Receiver<T> {
    inner: mpsc::UnboundedReceiver<T>,
}

impl<T> Receiver<T> {
    pub async fn recv(&mut self) -> Option<T> {
        self.inner.recv().await
    }
}

pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Sender { shared: Arc::new(Shared { tx: Mutex::new(Some(tx)) }) }, Receiver { inner: rx })
}
