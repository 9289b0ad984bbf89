use sha2::{Digest, Sha256};

use nostr_client_types::{Event, EventId, PublicKey};

/// Computes the event id for an about-to-be-signed event: the SHA-256 of its
/// canonical `[0,pubkey,created_at,kind,tags,content]` serialization.
pub fn compute_event_id(
    pubkey: &PublicKey,
    created_at: i64,
    kind: u16,
    tags: &[Vec<String>],
    content: &str,
) -> EventId {
    let canonical = Event::canonical_serialization(pubkey, created_at, kind, tags, content);
    let digest = Sha256::digest(canonical.as_bytes());
    EventId::from_bytes(digest.into())
}

/// A streaming SHA-256 hasher for content that shouldn't be buffered whole,
/// such as a file being chunked for NIP-95 storage.
#[derive(Default)]
pub struct StreamHasher {
    inner: Sha256,
}

impl StreamHasher {
    pub fn new() -> Self {
        Self { inner: Sha256::new() }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    pub fn finalize_hex(self) -> String {
        hex::encode(self.inner.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_event_id_is_deterministic() {
        let pk = PublicKey::from_hex(&"ab".repeat(32)).unwrap();
        let a = compute_event_id(&pk, 1700000000, 1, &[], "hello");
        let b = compute_event_id(&pk, 1700000000, 1, &[], "hello");
        assert_eq!(a, b);
    }

    #[test]
    fn stream_hasher_matches_one_shot() {
        let mut streamed = StreamHasher::new();
        streamed.update(b"hello ");
        streamed.update(b"world");
        let streamed_hex = streamed.finalize_hex();

        let one_shot = hex::encode(Sha256::digest(b"hello world"));
        assert_eq!(streamed_hex, one_shot);
    }
}
