use thiserror::Error;

use nostr_client_crypto::CryptoError;

#[derive(Debug, Error)]
pub enum FileCodecError {
    #[error("a MIME type is required (MIME guessing from file extension is an external collaborator)")]
    MissingMimeType,

    #[error("maxMessageSize is too small to fit even one zero-length chunk")]
    MessageSizeTooSmall,

    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),

    #[error("reading the blob failed: {0}")]
    Io(#[from] std::io::Error),
}
