use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("signature did not verify")]
    VerificationFailed,

    #[error("computed event id does not match the event's id field")]
    IdMismatch,
}
