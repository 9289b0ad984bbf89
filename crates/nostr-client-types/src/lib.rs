//! Wire-level data model for the Nostr relay protocol: event shapes, key
//! newtypes, and filters. No networking, no crypto — just the types every
//! other crate in this workspace builds on.

pub mod error;
pub mod event;
pub mod filter;
pub mod keys;

pub use error::TypesError;
pub use event::{kind, Event, UnsignedEvent};
pub use filter::Filter;
pub use keys::{EventId, PublicKey, SecretKey};
