use nostr_client_types::{PublicKey, SecretKey};

/// A Collector's configuration: who to replicate, where from, where to, and
/// which parts of the social graph to follow.
#[derive(Debug, Clone)]
pub struct Profile {
    pub pubkey: PublicKey,
    pub seckey: Option<SecretKey>,
    pub destination: String,
    pub source_relays: Vec<String>,
    pub fetch_mine: bool,
    pub fetch_follows: bool,
    pub fetch_my_refs: bool,
    pub fetch_follows_refs: bool,
    /// Cap on events copied per source relay for any one author.
    pub limit: u64,
}

impl Profile {
    pub fn new(pubkey: PublicKey, destination: impl Into<String>, source_relays: Vec<String>) -> Self {
        Self {
            pubkey,
            seckey: None,
            destination: destination.into(),
            source_relays,
            fetch_mine: true,
            fetch_follows: true,
            fetch_my_refs: true,
            fetch_follows_refs: true,
            limit: 500,
        }
    }
}
