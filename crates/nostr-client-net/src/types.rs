use url::Url;

use crate::error::RelayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Failed,
    Closed,
}

pub fn validate_relay_url(url: &str) -> Result<(), RelayError> {
    let parsed = Url::parse(url).map_err(|e| RelayError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "ws" | "wss" => Ok(()),
        other => Err(RelayError::InvalidUrl(format!("unsupported scheme: {other}"))),
    }
}

/// Lowercases the scheme/host and strips a trailing slash, so the same
/// logical relay is never cached under two different URL spellings.
pub fn normalize_relay_url(url: &str) -> String {
    let lowered = url.trim().to_ascii_lowercase();
    lowered.trim_end_matches('/').to_string()
}
