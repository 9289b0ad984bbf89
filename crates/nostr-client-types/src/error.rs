use thiserror::Error;

/// Errors raised while constructing or validating the wire-level data model.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
