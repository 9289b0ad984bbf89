use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("relay error: {0}")]
    Relay(#[from] nostr_client_net::RelayError),
}
