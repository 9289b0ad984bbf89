use thiserror::Error;

/// The binary's single error type: every inner crate's typed error converts
/// into this via `#[from]`, and `main` reports its `Display` plus a non-zero
/// exit code. Typed errors all the way down, flattened to one enum at the
/// edge where a human reads them.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Relay(#[from] nostr_client_net::RelayError),

    #[error(transparent)]
    Collector(#[from] nostr_client_collector::CollectorError),

    #[error(transparent)]
    FileCodec(#[from] nostr_client_filecodec::FileCodecError),

    #[error(transparent)]
    Config(#[from] nostr_client_config::ConfigError),

    #[error(transparent)]
    Crypto(#[from] nostr_client_crypto::CryptoError),

    #[error(transparent)]
    Types(#[from] nostr_client_types::TypesError),

    #[error("invalid NIP-19 string: {0}")]
    Nip19(String),

    #[error("invalid relay url: {0}")]
    InvalidUrl(String),

    #[error("invalid filter JSON: {0}")]
    FilterJson(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
