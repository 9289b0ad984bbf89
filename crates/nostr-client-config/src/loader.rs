use std::collections::HashMap;
use std::path::Path;

use nostr_client_collector::Profile;
use nostr_client_types::{PublicKey, SecretKey};

use crate::error::ConfigError;
use crate::schema::{ProfileDefaults, RawConfig, RawProfile, RelaySet};

/// A loaded, unresolved config document. Resolving a named profile merges
/// `[default]` into `[profiles.<name>]` and validates every required key is
/// present.
pub struct Config {
    raw: RawConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = config::File::from(path.as_ref()).format(config::FileFormat::Toml);
        let built = config::Config::builder().add_source(source).build()?;
        let raw: RawConfig = built.try_deserialize()?;
        Ok(Self { raw })
    }

    pub fn from_raw(raw: RawConfig) -> Self {
        Self { raw }
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.raw.profiles.keys().map(String::as_str)
    }

    /// Merges `[default]` into `[profiles.<name>]` and validates the result,
    /// producing a collector-ready `Profile`. Fails closed: a missing
    /// `pubkey`, an unresolvable `sourceRelays` name, or any malformed URL
    /// is a `ConfigError` rather than a silently-incomplete profile.
    pub fn resolve_profile(&self, name: &str) -> Result<Profile, ConfigError> {
        let profile = self
            .raw
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;
        resolve(name, profile, &self.raw.default, &self.raw.relay_sets)
    }
}

fn merged<'a, T>(profile_value: &'a Option<T>, default_value: &'a Option<T>) -> Option<&'a T> {
    profile_value.as_ref().or(default_value.as_ref())
}

fn resolve(
    name: &str,
    profile: &RawProfile,
    defaults: &ProfileDefaults,
    relay_sets: &HashMap<String, RelaySet>,
) -> Result<Profile, ConfigError> {
    let pubkey_hex = profile
        .pubkey
        .as_deref()
        .ok_or_else(|| ConfigError::MissingPubkey(name.to_string()))?;
    let pubkey = PublicKey::from_hex(pubkey_hex).map_err(|source| ConfigError::InvalidHex {
        profile: name.to_string(),
        key: "pubkey",
        source,
    })?;

    let seckey = profile
        .seckey
        .as_deref()
        .map(|hex| {
            SecretKey::from_hex(hex).map_err(|source| ConfigError::InvalidHex {
                profile: name.to_string(),
                key: "seckey",
                source,
            })
        })
        .transpose()?;

    let destination = merged(&profile.destination, &defaults.destination)
        .cloned()
        .ok_or_else(|| ConfigError::MissingDestination { profile: name.to_string() })?;
    url::Url::parse(&destination).map_err(|source| ConfigError::InvalidUrl {
        profile: name.to_string(),
        url: destination.clone(),
        source,
    })?;

    let relay_set_name = merged(&profile.source_relays, &defaults.source_relays)
        .cloned()
        .ok_or_else(|| ConfigError::MissingSourceRelays { profile: name.to_string() })?;
    let relay_set = relay_sets.get(&relay_set_name).ok_or_else(|| ConfigError::MissingRelaySet {
        profile: name.to_string(),
        relay_set: relay_set_name.clone(),
    })?;
    for relay_url in &relay_set.relays {
        url::Url::parse(relay_url).map_err(|source| ConfigError::InvalidUrl {
            profile: name.to_string(),
            url: relay_url.clone(),
            source,
        })?;
    }

    let mut resolved = Profile::new(pubkey, destination, relay_set.relays.clone());
    resolved.seckey = seckey;
    resolved.fetch_mine = merged(&profile.fetch_mine, &defaults.fetch_mine).copied().unwrap_or(true);
    resolved.fetch_follows = merged(&profile.fetch_follows, &defaults.fetch_follows).copied().unwrap_or(true);
    resolved.fetch_my_refs = merged(&profile.fetch_my_refs, &defaults.fetch_my_refs).copied().unwrap_or(true);
    resolved.fetch_follows_refs =
        merged(&profile.fetch_follows_refs, &defaults.fetch_follows_refs).copied().unwrap_or(true);

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [default]
        destination = "wss://default.example/relay"
        sourceRelays = "mine"

        [profiles.alice]
        pubkey = "82a4a84ca26e47fb041606f6e6baba3dc5c82a74bc9921a70c909c52067e5351"
        fetchFollows = false

        [profiles.bare]
        pubkey = "82a4a84ca26e47fb041606f6e6baba3dc5c82a74bc9921a70c909c52067e5351"
        sourceRelays = "missing"

        [relaySets.mine]
        relays = ["wss://relay1.example", "wss://relay2.example"]
    "#;

    fn load_sample() -> Config {
        let raw: RawConfig = toml::from_str(SAMPLE).unwrap();
        Config::from_raw(raw)
    }

    #[test]
    fn resolves_profile_inheriting_defaults() {
        let cfg = load_sample();
        let profile = cfg.resolve_profile("alice").unwrap();
        assert_eq!(profile.destination, "wss://default.example/relay");
        assert_eq!(profile.source_relays, vec!["wss://relay1.example", "wss://relay2.example"]);
        assert!(!profile.fetch_follows);
        assert!(profile.fetch_mine);
        assert!(profile.fetch_my_refs);
        assert!(profile.fetch_follows_refs);
        assert!(profile.seckey.is_none());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = load_sample();
        assert!(matches!(cfg.resolve_profile("nope"), Err(ConfigError::ProfileNotFound(_))));
    }

    #[test]
    fn missing_relay_set_is_an_error() {
        let cfg = load_sample();
        assert!(matches!(cfg.resolve_profile("bare"), Err(ConfigError::MissingRelaySet { .. })));
    }

    #[test]
    fn missing_pubkey_is_an_error() {
        let raw: RawConfig = toml::from_str(
            r#"
            [profiles.nopubkey]
            destination = "wss://x.example"
            "#,
        )
        .unwrap();
        let cfg = Config::from_raw(raw);
        assert!(matches!(cfg.resolve_profile("nopubkey"), Err(ConfigError::MissingPubkey(_))));
    }
}
