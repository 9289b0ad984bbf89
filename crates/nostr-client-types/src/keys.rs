use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypesError;

type Result<T> = std::result::Result<T, TypesError>;

macro_rules! fixed_hex_bytes {
    ($name:ident, $len:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub fn from_hex(s: &str) -> Result<Self> {
                let bytes = hex::decode(s).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
                if bytes.len() != $len {
                    return Err(TypesError::InvalidLength {
                        expected: $len,
                        actual: bytes.len(),
                    });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }

            pub fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                struct HexVisitor;
                impl<'de> Visitor<'de> for HexVisitor {
                    type Value = $name;
                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        write!(f, "a {}-byte hex string", $len)
                    }
                    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                        $name::from_hex(v).map_err(de::Error::custom)
                    }
                }
                deserializer.deserialize_str(HexVisitor)
            }
        }
    };
}

fixed_hex_bytes!(EventId, 32, "A 32-byte event id, the SHA-256 of the event's canonical serialization.");
fixed_hex_bytes!(PublicKey, 32, "A 32-byte x-only secp256k1 public key.");
fixed_hex_bytes!(SecretKey, 32, "A 32-byte secp256k1 secret key.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_hex() {
        let hex = "82a4a84ca26e47fb041606f6e6baba3dc5c82a74bc9921a70c909c52067e535";
        // pad to 64 chars for a valid 32-byte value
        let hex = format!("{}1", hex);
        let id = EventId::from_hex(&hex).unwrap();
        assert_eq!(id.to_hex(), hex);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(EventId::from_hex("deadbeef").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(EventId::from_hex(&"zz".repeat(32)).is_err());
    }
}
