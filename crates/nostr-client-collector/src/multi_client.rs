use std::collections::HashMap;

use rand::seq::SliceRandom;

use nostr_client_net::ConnectionRegistry;
use nostr_client_types::{Event, EventId, Filter, PublicKey};

/// Fetches events or profiles across a set of source relays, trying them in
/// shuffled order and stopping as soon as enough has been found. A single
/// source relay's failure is logged and skipped — never fatal to the
/// overall fetch.
pub struct MultiClient<'a> {
    registry: &'a ConnectionRegistry,
    relays: Vec<String>,
}

impl<'a> MultiClient<'a> {
    pub fn new(registry: &'a ConnectionRegistry, relays: Vec<String>) -> Self {
        Self { registry, relays }
    }

    fn shuffled_relays(&self) -> Vec<String> {
        let mut relays = self.relays.clone();
        relays.shuffle(&mut rand::thread_rng());
        relays
    }

    /// Queries each relay (shuffled) for `ids`, removing discovered ids from
    /// the remaining set as they're found, until every id is accounted for
    /// or every relay has been tried.
    pub async fn get_events(&self, ids: &[EventId]) -> HashMap<EventId, Event> {
        let mut remaining: Vec<EventId> = ids.to_vec();
        let mut found = HashMap::new();

        for url in self.shuffled_relays() {
            if remaining.is_empty() {
                break;
            }
            let conn = match self.registry.get_or_connect(&url).await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(relay = %url, error = %e, "MultiClient: source relay unreachable, skipping");
                    continue;
                }
            };

            let filter = Filter::new().ids(remaining.clone()).limit(remaining.len() as u64);
            let events = conn.query_simple(filter, Some(remaining.len() as u64)).await;
            for event in events {
                remaining.retain(|id| *id != event.id);
                found.insert(event.id, event);
            }
        }

        found
    }

    /// Returns the first non-null kind-0 profile event found for `pubkey`
    /// across the shuffled relay list.
    pub async fn get_profile(&self, pubkey: PublicKey) -> Option<Event> {
        self.get_one(Filter::new().authors(vec![pubkey]).kinds(vec![nostr_client_types::kind::METADATA])).await
    }

    /// Returns the first non-null event matching `filter` found across the
    /// shuffled relay list. Used for the seed phase's "any reachable
    /// source" lookups.
    pub async fn get_one(&self, filter: Filter) -> Option<Event> {
        for url in self.shuffled_relays() {
            let conn = match self.registry.get_or_connect(&url).await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(relay = %url, error = %e, "MultiClient: source relay unreachable, skipping");
                    continue;
                }
            };

            if let Some(event) = conn.query_one(filter.clone()).await {
                return Some(event);
            }
        }
        None
    }
}
