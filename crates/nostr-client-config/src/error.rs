use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("profile '{0}' is not defined")]
    ProfileNotFound(String),

    #[error("profile '{0}' has no pubkey")]
    MissingPubkey(String),

    #[error("profile '{profile}' has an invalid {key}: {source}")]
    InvalidHex {
        profile: String,
        key: &'static str,
        source: nostr_client_types::TypesError,
    },

    #[error("profile '{profile}' has no destination relay configured")]
    MissingDestination { profile: String },

    #[error("profile '{profile}' has an invalid destination url '{url}': {source}")]
    InvalidUrl {
        profile: String,
        url: String,
        source: url::ParseError,
    },

    #[error("profile '{profile}' references unknown relay set '{relay_set}'")]
    MissingRelaySet { profile: String, relay_set: String },

    #[error("profile '{profile}' has no sourceRelays configured")]
    MissingSourceRelays { profile: String },
}
