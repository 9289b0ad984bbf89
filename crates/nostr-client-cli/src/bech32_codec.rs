//! NIP-19 bech32 encoding for `npub`/`nsec`/`note`, backing the `lookup` and
//! `decode` subcommands. No TLV entities (`nprofile`, `nevent`, ...) - this
//! is the plain 32-byte-payload subset only.

use bech32::{Bech32, Hrp};

use crate::cli::Nip19Kind;
use crate::error::CliError;

const HRP_NPUB: &str = "npub";
const HRP_NSEC: &str = "nsec";
const HRP_NOTE: &str = "note";

fn hrp_for(kind: Nip19Kind) -> &'static str {
    match kind {
        Nip19Kind::Npub => HRP_NPUB,
        Nip19Kind::Nsec => HRP_NSEC,
        Nip19Kind::Note => HRP_NOTE,
    }
}

/// Encodes a 64-hex-char, 32-byte value as a NIP-19 bech32 string.
pub fn encode(kind: Nip19Kind, hex_value: &str) -> Result<String, CliError> {
    let bytes = hex::decode(hex_value).map_err(|e| CliError::Nip19(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(CliError::Nip19(format!("expected a 32-byte value, got {} bytes", bytes.len())));
    }
    let hrp = Hrp::parse(hrp_for(kind)).map_err(|e| CliError::Nip19(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, &bytes).map_err(|e| CliError::Nip19(e.to_string()))
}

pub struct Decoded {
    pub hrp: String,
    pub hex: String,
}

/// Decodes a NIP-19 bech32 string, rejecting any prefix other than the three
/// this crate speaks.
pub fn decode(value: &str) -> Result<Decoded, CliError> {
    let (hrp, data) = bech32::decode(value).map_err(|e| CliError::Nip19(e.to_string()))?;
    let hrp_str = hrp.to_string();
    if hrp_str != HRP_NPUB && hrp_str != HRP_NSEC && hrp_str != HRP_NOTE {
        return Err(CliError::Nip19(format!(
            "unsupported NIP-19 prefix '{hrp_str}' (only npub/nsec/note are supported)"
        )));
    }
    if data.len() != 32 {
        return Err(CliError::Nip19(format!("expected a 32-byte payload, got {} bytes", data.len())));
    }
    Ok(Decoded { hrp: hrp_str, hex: hex::encode(data) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_npub() {
        let hex_value = "82a4a84ca26e47fb041606f6e6baba3dc5c82a74bc9921a70c909c52067e535";
        let encoded = encode(Nip19Kind::Npub, hex_value).unwrap();
        assert!(encoded.starts_with("npub1"));
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.hrp, "npub");
        assert_eq!(decoded.hex, hex_value);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(encode(Nip19Kind::Note, "deadbeef").is_err());
    }

    #[test]
    fn decode_rejects_unknown_prefix() {
        let hrp = Hrp::parse("nprofile").unwrap();
        let encoded = bech32::encode::<Bech32>(hrp, &[0u8; 32]).unwrap();
        assert!(decode(&encoded).is_err());
    }
}
