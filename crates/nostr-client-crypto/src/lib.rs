//! Event hashing and BIP-340 schnorr signing/verification over secp256k1.

pub mod error;
pub mod hash;
pub mod sign;

pub use error::CryptoError;
pub use hash::{compute_event_id, StreamHasher};
pub use sign::{derive_public_key, generate_keypair, sign_event, verify, verify_event_signature, Signer};
