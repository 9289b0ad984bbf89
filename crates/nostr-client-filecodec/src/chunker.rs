use crate::error::FileCodecError;

/// The invariant-size JSON envelope of a signed event with empty content:
/// id + pubkey + sig + `created_at` + `kind` + empty tags + zero-length
/// content, no whitespace, with a 10-digit Unix-seconds `created_at`
/// (verified by `event_overhead_matches_fixed_event` below).
pub const EVENT_OVERHEAD: usize = 345;

/// The chunk size (in raw bytes, before base64) for a given
/// `max_message_size`: the largest multiple of 3 that keeps the base64-
/// encoded chunk's `content` field within the per-event JSON budget, so
/// base64 never needs padding.
pub fn chunk_size_for(max_message_size: usize) -> Result<usize, FileCodecError> {
    let max_content_size = max_message_size
        .checked_sub(EVENT_OVERHEAD)
        .ok_or(FileCodecError::MessageSizeTooSmall)?;
    let raw = (max_content_size * 3) / 4;
    let rounded = raw - (raw % 3);
    if rounded == 0 {
        return Err(FileCodecError::MessageSizeTooSmall);
    }
    Ok(rounded)
}

/// Splits `total_size` bytes into byte ranges of at most `chunk_size`,
/// every non-final range exactly `chunk_size` long.
pub fn chunk_ranges(total_size: u64, chunk_size: usize) -> Vec<(u64, u64)> {
    if total_size == 0 {
        return vec![(0, 0)];
    }
    let chunk_size = chunk_size as u64;
    let mut ranges = Vec::new();
    let mut offset = 0u64;
    while offset < total_size {
        let len = chunk_size.min(total_size - offset);
        ranges.push((offset, len));
        offset += len;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_overhead_matches_fixed_event() {
        use nostr_client_types::Event;

        let hex32 = "82a4a84ca26e47fb041606f6e6baba3dc5c82a74bc9921a70c909c52067e5351";
        let event = Event {
            id: nostr_client_types::EventId::from_hex(hex32).unwrap(),
            pubkey: nostr_client_types::PublicKey::from_hex(hex32).unwrap(),
            created_at: 1_700_000_000,
            kind: 1064,
            tags: vec![],
            content: String::new(),
            sig: "00".repeat(64),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json.len(), EVENT_OVERHEAD);
    }

    #[test]
    fn chunk_size_for_16kib_budget() {
        // maxContentSize = 16384 - 345 = 16039; floor(16039*3/4) = 12029,
        // rounded down to a multiple of 3 = 12027.
        assert_eq!(chunk_size_for(16384).unwrap(), 12027);
    }

    #[test]
    fn chunk_ranges_splits_with_exact_final_remainder() {
        let ranges = chunk_ranges(65536, 12027);
        assert_eq!(ranges.len(), 6);
        for (_, len) in &ranges[..5] {
            assert_eq!(*len, 12027);
        }
        assert_eq!(ranges[5].1, 65536 - 5 * 12027);
    }

    #[test]
    fn too_small_budget_is_an_error() {
        assert!(chunk_size_for(300).is_err());
    }
}
