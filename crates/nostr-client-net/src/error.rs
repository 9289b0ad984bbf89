use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("connection is not open")]
    ConnectionNotOpen,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("relay protocol violation: {0}")]
    ProtocolError(String),

    #[error("publish rejected: {0}")]
    PublishRejected(String),

    #[error("invalid relay url: {0}")]
    InvalidUrl(String),

    #[error("websocket error: {0}")]
    WebSocketError(String),

    #[error("decode error: {0}")]
    Decode(#[from] nostr_client_codec::DecodeError),
}
