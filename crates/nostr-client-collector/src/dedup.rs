use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use nostr_client_types::{EventId, PublicKey};

/// Tracks what a Collector run has already submitted to `try_publish`, so
/// concurrent fan-out tasks racing on the same referenced event or profile
/// don't both attempt to copy it.
///
/// The event-id set is populated *before* the publish attempt, not after it
/// succeeds — that's what makes it a stampede guard rather than a cache: two
/// tasks that both record an id close together will see each other's
/// reservation even if neither has finished publishing yet.
///
/// Unbounded for the lifetime of one `Collector::run()` (LRU bounding across
/// runs is out of scope for this core — see DESIGN.md).
#[derive(Default)]
pub struct DedupState {
    copied_events: Mutex<HashSet<EventId>>,
    copied_profiles: Mutex<HashMap<PublicKey, i64>>,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `id` for this run. Returns `true` if this caller is the
    /// first to reserve it (and so should proceed to publish it).
    pub async fn reserve_event(&self, id: EventId) -> bool {
        self.copied_events.lock().await.insert(id)
    }

    pub async fn has_event(&self, id: &EventId) -> bool {
        self.copied_events.lock().await.contains(id)
    }

    /// Reserves `pubkey`'s profile for copying if it hasn't been copied at
    /// least as recently as `created_at`. Returns `true` if the caller
    /// should proceed.
    pub async fn reserve_profile(&self, pubkey: PublicKey, created_at: i64) -> bool {
        let mut guard = self.copied_profiles.lock().await;
        match guard.get(&pubkey) {
            Some(&existing) if existing >= created_at => false,
            _ => {
                guard.insert(pubkey, created_at);
                true
            }
        }
    }

    pub async fn has_profile(&self, pubkey: &PublicKey) -> bool {
        self.copied_profiles.lock().await.contains_key(pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reserve_event_guards_against_stampede() {
        let dedup = DedupState::new();
        let id = EventId::from_hex(&"ab".repeat(32)).unwrap();
        assert!(dedup.reserve_event(id).await);
        assert!(!dedup.reserve_event(id).await);
    }

    #[tokio::test]
    async fn reserve_profile_only_recopies_when_newer() {
        let dedup = DedupState::new();
        let pk = PublicKey::from_hex(&"cd".repeat(32)).unwrap();
        assert!(dedup.reserve_profile(pk, 100).await);
        assert!(!dedup.reserve_profile(pk, 100).await);
        assert!(!dedup.reserve_profile(pk, 50).await);
        assert!(dedup.reserve_profile(pk, 200).await);
    }
}
