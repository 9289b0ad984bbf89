use serde::{Deserialize, Serialize};

use crate::keys::{EventId, PublicKey};

/// Well-known event kinds referenced throughout this crate and its callers.
pub mod kind {
    pub const METADATA: u16 = 0;
    pub const TEXT_NOTE: u16 = 1;
    pub const CONTACT_LIST: u16 = 3;
    pub const ENCRYPTED_DIRECT_MESSAGE: u16 = 4;
    pub const DELETION: u16 = 5;
    pub const REPOST: u16 = 6;
    pub const REACTION: u16 = 7;
    pub const RELAY_LIST: u16 = 10002;
    pub const FILE_CHUNK: u16 = 1064;
    pub const FILE_METADATA: u16 = 1065;
}

/// A signed, immutable Nostr event.
///
/// The field order here matches the wire JSON shape exactly; `Event` derives
/// `Serialize`/`Deserialize` directly rather than going through a separate
/// DTO layer, since the wire format IS this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub pubkey: PublicKey,
    pub created_at: i64,
    pub kind: u16,
    pub tags: Vec<Vec<String>>,
    pub content: String,
    pub sig: String,
}

/// The same shape as `Event` minus `id`, `pubkey`, and `sig` — what a caller
/// hands to a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    pub created_at: i64,
    pub kind: u16,
    pub tags: Vec<Vec<String>>,
    pub content: String,
}

impl UnsignedEvent {
    pub fn new(kind: u16, content: impl Into<String>, tags: Vec<Vec<String>>, created_at: i64) -> Self {
        Self {
            created_at,
            kind,
            tags,
            content: content.into(),
        }
    }
}

impl Event {
    /// The canonical JSON array `[0,pubkey,created_at,kind,tags,content]`
    /// whose SHA-256 is the event id. No whitespace, per NIP-01.
    pub fn canonical_serialization(
        pubkey: &PublicKey,
        created_at: i64,
        kind: u16,
        tags: &[Vec<String>],
        content: &str,
    ) -> String {
        // serde_json's compact writer already produces the minimal-whitespace,
        // correctly-escaped form NIP-01 requires for this five-tuple.
        let value = serde_json::json!([0, pubkey.to_hex(), created_at, kind, tags, content]);
        serde_json::to_string(&value).expect("tuple of primitives never fails to serialize")
    }

    /// Every referenced event id (`e` tags) and pubkey (`p` tags, plus the
    /// author itself), used by the collector's reference-extraction pass.
    pub fn extract_refs(&self) -> (Vec<EventId>, Vec<PublicKey>) {
        let mut event_ids = Vec::new();
        let mut pubkeys = vec![self.pubkey];
        for tag in &self.tags {
            if tag.len() < 2 {
                continue;
            }
            match tag[0].as_str() {
                "e" => {
                    if let Ok(id) = EventId::from_hex(&tag[1]) {
                        event_ids.push(id);
                    }
                }
                "p" => {
                    if let Ok(pk) = PublicKey::from_hex(&tag[1]) {
                        pubkeys.push(pk);
                    }
                }
                _ => {}
            }
        }
        (event_ids, pubkeys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_serialization_has_no_whitespace() {
        let pk = PublicKey::from_hex(&"ab".repeat(32)).unwrap();
        let s = Event::canonical_serialization(&pk, 1700000000, 1, &[], "hi");
        assert!(!s.contains(' '));
        assert!(s.starts_with("[0,\""));
    }

    #[test]
    fn extract_refs_collects_e_and_p_tags_and_author() {
        let pk = PublicKey::from_hex(&"11".repeat(32)).unwrap();
        let other = "22".repeat(32);
        let eid = "33".repeat(32);
        let event = Event {
            id: EventId::from_hex(&"44".repeat(32)).unwrap(),
            pubkey: pk,
            created_at: 0,
            kind: 1,
            tags: vec![vec!["p".to_string(), other.clone()], vec!["e".to_string(), eid.clone()]],
            content: String::new(),
            sig: String::new(),
        };
        let (event_ids, pubkeys) = event.extract_refs();
        assert_eq!(event_ids, vec![EventId::from_hex(&eid).unwrap()]);
        assert!(pubkeys.contains(&pk));
        assert!(pubkeys.contains(&PublicKey::from_hex(&other).unwrap()));
    }
}
