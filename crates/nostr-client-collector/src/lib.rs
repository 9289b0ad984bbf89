//! Replicates a pubkey's social graph — its own events, followed accounts'
//! events, and the `e`/`p` references those events carry — from a set of
//! source relays to a single destination relay.

pub mod collector;
pub mod dedup;
pub mod error;
pub mod multi_client;
pub mod profile;

pub use collector::{Collector, CollectorReport};
pub use dedup::DedupState;
pub use error::CollectorError;
pub use multi_client::MultiClient;
pub use profile::Profile;
