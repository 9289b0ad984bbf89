use std::collections::HashMap;

use serde::Deserialize;

/// The TOML document shape: `[default]`, `[profiles.<name>]`,
/// `[relaySets.<name>]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub default: ProfileDefaults,
    #[serde(default)]
    pub profiles: HashMap<String, RawProfile>,
    #[serde(default, rename = "relaySets")]
    pub relay_sets: HashMap<String, RelaySet>,
}

/// Keys that fall back to `[default]` when a profile doesn't set them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileDefaults {
    pub destination: Option<String>,
    #[serde(rename = "fetchMine")]
    pub fetch_mine: Option<bool>,
    #[serde(rename = "fetchFollows")]
    pub fetch_follows: Option<bool>,
    #[serde(rename = "fetchMyRefs")]
    pub fetch_my_refs: Option<bool>,
    #[serde(rename = "fetchFollowsRefs")]
    pub fetch_follows_refs: Option<bool>,
    #[serde(rename = "sourceRelays")]
    pub source_relays: Option<String>,
}

/// One `[profiles.<name>]` table. `pubkey` has no default — it is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfile {
    pub pubkey: Option<String>,
    pub seckey: Option<String>,
    pub destination: Option<String>,
    #[serde(rename = "fetchMine")]
    pub fetch_mine: Option<bool>,
    #[serde(rename = "fetchFollows")]
    pub fetch_follows: Option<bool>,
    #[serde(rename = "fetchMyRefs")]
    pub fetch_my_refs: Option<bool>,
    #[serde(rename = "fetchFollowsRefs")]
    pub fetch_follows_refs: Option<bool>,
    #[serde(rename = "sourceRelays")]
    pub source_relays: Option<String>,
}

/// A `[relaySets.<name>]` table: `{ relays = [ws-url, ...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct RelaySet {
    pub relays: Vec<String>,
}
