use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::connection::RelayConnection;
use crate::error::RelayError;
use crate::types::{normalize_relay_url, ConnectionStatus};

/// Caches one [`RelayConnection`] per distinct (normalized) URL. A cached
/// connection found in `Closed` or `Failed` state is discarded and
/// reconnected lazily on next use.
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<String, Arc<RelayConnection>>>,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self { connections: Mutex::new(HashMap::new()) }
    }

    /// Returns the cached connection for `url`, connecting a fresh one if
    /// none is cached or the cached one has gone stale.
    pub async fn get_or_connect(&self, url: &str) -> Result<Arc<RelayConnection>, RelayError> {
        let key = normalize_relay_url(url);
        let mut guard = self.connections.lock().await;

        if let Some(conn) = guard.get(&key) {
            match conn.status() {
                ConnectionStatus::Closed | ConnectionStatus::Failed => {}
                _ => return Ok(conn.clone()),
            }
        }

        let conn = RelayConnection::connect(url.to_string()).await?;
        guard.insert(key, conn.clone());
        Ok(conn)
    }

    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }
}
