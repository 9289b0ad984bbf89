use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};

use nostr_client_net::{ConnectionRegistry, RelayConnection};
use nostr_client_types::{kind, Event, EventId, Filter, PublicKey};

use crate::dedup::DedupState;
use crate::error::CollectorError;
use crate::multi_client::MultiClient;
use crate::profile::Profile;

/// Bounded parallelism for the event-refs fan-out, via `tokio::sync::Semaphore`
/// rather than an unbounded join so a burst of referenced ids can't open
/// hundreds of simultaneous subscriptions against one relay.
const EVENT_REFS_CONCURRENCY: usize = 3;
/// Bounded parallelism for the profile-refs fan-out: some relays reject
/// concurrent requests from the same connection, so this phase runs its
/// fetches one at a time.
const PROFILE_REFS_CONCURRENCY: usize = 1;
/// Event-id REQ batch size for the event-refs phase.
const EVENT_REFS_CHUNK_SIZE: usize = 50;

/// Which phase a recorded `e`/`p` ref came from, so phases 4/5 can honor
/// `fetch_my_refs` and `fetch_follows_refs` independently instead of
/// pooling every ref regardless of whose event it was tagged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefOrigin {
    Owner,
    Follows,
}

/// Replicates one pubkey's social graph from a set of source relays to a
/// single destination relay. One Collector per destination profile; `run()`
/// drives the five-phase pipeline to completion.
pub struct Collector {
    profile: Profile,
    registry: ConnectionRegistry,
    dedup: DedupState,
    owner_event_refs: Mutex<HashSet<EventId>>,
    follows_event_refs: Mutex<HashSet<EventId>>,
    owner_profile_refs: Mutex<HashSet<PublicKey>>,
    follows_profile_refs: Mutex<HashSet<PublicKey>>,
}

/// Tally of what one `run()` copied, for callers (e.g. the CLI) to report.
#[derive(Debug, Clone, Default)]
pub struct CollectorReport {
    pub events_published: u64,
    pub profiles_published: u64,
}

impl Collector {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            registry: ConnectionRegistry::new(),
            dedup: DedupState::new(),
            owner_event_refs: Mutex::new(HashSet::new()),
            follows_event_refs: Mutex::new(HashSet::new()),
            owner_profile_refs: Mutex::new(HashSet::new()),
            follows_profile_refs: Mutex::new(HashSet::new()),
        }
    }

    fn multi_client(&self) -> MultiClient<'_> {
        MultiClient::new(&self.registry, self.profile.source_relays.clone())
    }

    async fn destination(&self) -> Result<Arc<RelayConnection>, CollectorError> {
        Ok(self.registry.get_or_connect(&self.profile.destination).await?)
    }

    fn event_refs_for(&self, origin: RefOrigin) -> &Mutex<HashSet<EventId>> {
        match origin {
            RefOrigin::Owner => &self.owner_event_refs,
            RefOrigin::Follows => &self.follows_event_refs,
        }
    }

    fn profile_refs_for(&self, origin: RefOrigin) -> &Mutex<HashSet<PublicKey>> {
        match origin {
            RefOrigin::Owner => &self.owner_profile_refs,
            RefOrigin::Follows => &self.follows_profile_refs,
        }
    }

    /// Publishes `event` to the destination if it hasn't already been
    /// reserved by another task in this run, recording its refs under
    /// `origin` on success so phase 4/5 gating stays per-source.
    async fn copy_event(&self, event: Event, destination: &Arc<RelayConnection>, origin: RefOrigin) -> bool {
        if !self.dedup.reserve_event(event.id).await {
            return false;
        }
        let (event_ids, pubkeys) = event.extract_refs();
        let outcome = destination.try_publish(event).await;
        if !outcome.published {
            return false;
        }
        {
            let mut refs = self.event_refs_for(origin).lock().await;
            refs.extend(event_ids);
        }
        {
            let mut refs = self.profile_refs_for(origin).lock().await;
            refs.extend(pubkeys);
        }
        true
    }

    /// Runs the full five-phase replication pipeline, sequentially, each
    /// phase's recorded refs feeding the next.
    pub async fn run(&self) -> Result<CollectorReport, CollectorError> {
        let destination = self.destination().await?;
        let mut report = CollectorReport::default();

        self.seed(&destination, &mut report).await;

        if self.profile.fetch_mine {
            report.events_published +=
                self.copy_authored_events(self.profile.pubkey, &destination, RefOrigin::Owner).await;
        }

        if self.profile.fetch_follows {
            let follows = self.read_follows(&destination).await;
            for pubkey in follows {
                report.events_published +=
                    self.copy_authored_events(pubkey, &destination, RefOrigin::Follows).await;
            }
        }

        if self.profile.fetch_my_refs {
            report.events_published += self.copy_event_refs(&destination, RefOrigin::Owner).await;
            report.profiles_published += self.copy_profile_refs(&destination, RefOrigin::Owner).await;
        }
        if self.profile.fetch_follows_refs {
            report.events_published += self.copy_event_refs(&destination, RefOrigin::Follows).await;
            report.profiles_published += self.copy_profile_refs(&destination, RefOrigin::Follows).await;
        }

        Ok(report)
    }

    /// Phase 1: copy the owner's kind-0 and kind-3 events from any reachable
    /// source to the destination.
    async fn seed(&self, destination: &Arc<RelayConnection>, report: &mut CollectorReport) {
        let client = self.multi_client();
        for target_kind in [kind::METADATA, kind::CONTACT_LIST] {
            let filter = Filter::new().authors(vec![self.profile.pubkey]).kinds(vec![target_kind]);
            if let Some(event) = client.get_one(filter).await {
                if self.copy_event(event, destination, RefOrigin::Owner).await {
                    report.events_published += 1;
                }
            }
        }
    }

    /// Phase 2/3 worker: copies up to `profile.limit` events authored by
    /// `pubkey` from each source relay in turn, tagging recorded refs with
    /// `origin` (owner vs. a followed account) for phase 4/5 gating.
    async fn copy_authored_events(
        &self,
        pubkey: PublicKey,
        destination: &Arc<RelayConnection>,
        origin: RefOrigin,
    ) -> u64 {
        let mut copied = 0u64;
        for url in &self.profile.source_relays {
            let conn = match self.registry.get_or_connect(url).await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(relay = %url, error = %e, "collector: source relay unreachable, skipping");
                    continue;
                }
            };
            let filter = Filter::new().authors(vec![pubkey]).limit(self.profile.limit);
            let events = conn.query_simple(filter, Some(self.profile.limit)).await;
            for event in events {
                if self.copy_event(event, destination, origin).await {
                    copied += 1;
                }
            }
        }
        copied
    }

    /// Phase 3: reads the destination's latest kind-3 event for the owner
    /// and extracts the followed pubkeys from its `p` tags.
    async fn read_follows(&self, destination: &Arc<RelayConnection>) -> Vec<PublicKey> {
        let filter = Filter::new().authors(vec![self.profile.pubkey]).kinds(vec![kind::CONTACT_LIST]);
        let Some(event) = destination.query_one(filter).await else {
            return Vec::new();
        };
        event
            .tags
            .iter()
            .filter(|tag| tag.len() >= 2 && tag[0] == "p")
            .filter_map(|tag| PublicKey::from_hex(&tag[1]).ok())
            .collect()
    }

    /// Phase 4: fetches every event id recorded under `origin` not yet
    /// copied, chunked and bounded to `EVENT_REFS_CONCURRENCY` concurrent
    /// fetches.
    async fn copy_event_refs(&self, destination: &Arc<RelayConnection>, origin: RefOrigin) -> u64 {
        let pending: Vec<EventId> = {
            let refs = self.event_refs_for(origin).lock().await;
            let mut pending = Vec::new();
            for id in refs.iter() {
                if !self.dedup.has_event(id).await {
                    pending.push(*id);
                }
            }
            pending
        };
        if pending.is_empty() {
            return 0;
        }

        let semaphore = Arc::new(Semaphore::new(EVENT_REFS_CONCURRENCY));
        let mut tasks = Vec::new();
        for chunk in pending.chunks(EVENT_REFS_CHUNK_SIZE) {
            let chunk = chunk.to_vec();
            let semaphore = Arc::clone(&semaphore);
            tasks.push(async move {
                let _permit = semaphore.acquire().await.expect("semaphore is never closed");
                let found = self.multi_client().get_events(&chunk).await;
                let mut copied = 0u64;
                for event in found.into_values() {
                    if self.copy_event(event, destination, origin).await {
                        copied += 1;
                    }
                }
                copied
            });
        }
        futures::future::join_all(tasks).await.into_iter().sum()
    }

    /// Phase 5: fetches every pubkey recorded under `origin` not yet copied,
    /// one at a time (`PROFILE_REFS_CONCURRENCY` == 1 — some relays reject
    /// concurrent requests from the same connection).
    async fn copy_profile_refs(&self, destination: &Arc<RelayConnection>, origin: RefOrigin) -> u64 {
        let pending: Vec<PublicKey> = {
            let refs = self.profile_refs_for(origin).lock().await;
            let mut pending = Vec::new();
            for pubkey in refs.iter() {
                if !self.dedup.has_profile(pubkey).await {
                    pending.push(*pubkey);
                }
            }
            pending
        };
        if pending.is_empty() {
            return 0;
        }

        let semaphore = Arc::new(Semaphore::new(PROFILE_REFS_CONCURRENCY));
        let mut tasks = Vec::new();
        for pubkey in pending {
            let semaphore = Arc::clone(&semaphore);
            tasks.push(async move {
                let _permit = semaphore.acquire().await.expect("semaphore is never closed");
                let Some(event) = self.multi_client().get_profile(pubkey).await else {
                    return false;
                };
                if !self.dedup.reserve_profile(pubkey, event.created_at).await {
                    return false;
                }
                destination.try_publish(event).await.published
            });
        }
        futures::future::join_all(tasks).await.into_iter().filter(|ok| *ok).count() as u64
    }
}
