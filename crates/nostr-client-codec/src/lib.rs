//! NIP-01 wire message encoding/decoding: the JSON tuple framing for both
//! client→relay and relay→client directions.

pub mod client_message;
pub mod error;
pub mod relay_message;

pub use client_message::ClientMessage;
pub use error::DecodeError;
pub use relay_message::RelayMessage;
