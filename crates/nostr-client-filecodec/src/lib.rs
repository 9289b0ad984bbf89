//! A NIP-95 file codec: splits an arbitrary blob into a lazily-signed
//! sequence of base64-encoded chunk events plus a metadata event naming the
//! whole file's SHA-256 and the ordered list of chunk ids.

pub mod chunker;
pub mod encode;
pub mod error;

pub use chunker::{chunk_ranges, chunk_size_for, EVENT_OVERHEAD};
pub use encode::{plan, ChunkEvents, EncodePlan, FileCodecOptions, SeekRead};
pub use error::FileCodecError;

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use nostr_client_types::SecretKey;

    use super::*;

    fn signer() -> SecretKey {
        SecretKey::from_hex("f5dfe77a89298142e2d464ca4368485c8b23825c082ff69be80538f980c403dc").unwrap()
    }

    /// A 64 KiB all-zero blob with `maxMessageSize` = 16384 splits into
    /// exactly 6 chunk events (each
    /// `blockSize` = 12027 bytes, per `chunk_size_for_16kib_budget`) plus one
    /// metadata event, and the metadata's `x` tag is the file's real SHA-256.
    #[test]
    fn encodes_64kib_zero_blob_into_one_metadata_and_six_chunks() {
        let signer = signer();
        let blob_bytes = vec![0u8; 65536];
        let mut blob = Cursor::new(blob_bytes);

        let options = FileCodecOptions::new("zeros.bin", "application/octet-stream", 16384);
        let plan = plan(&mut blob, 65536, &signer, &options).unwrap();

        assert_eq!(plan.chunk_size, 12027);
        assert_eq!(plan.num_chunks(), 6);
        assert_eq!(
            plan.sha256_hex,
            "de2f256064a0af797747c2b97505dc0b9f3df0de4f489eac731c23ae9ca9cc31"
        );

        let metadata_json = serde_json::to_string(&plan.metadata_event).unwrap();
        assert!(metadata_json.len() <= 16384);
        assert_eq!(plan.metadata_event.kind, nostr_client_types::kind::FILE_METADATA);

        let e_tags: Vec<&str> = plan
            .metadata_event
            .tags
            .iter()
            .filter(|t| t[0] == "e")
            .map(|t| t[1].as_str())
            .collect();
        assert_eq!(e_tags.len(), 6);

        let block_size_tag = plan.metadata_event.tags.iter().find(|t| t[0] == "blockSize").unwrap();
        assert_eq!(block_size_tag[1], "12027");

        let mut seen_ids = Vec::new();
        let mut emitted = 0;
        for (i, chunk) in plan.chunk_events(&mut blob, &signer).enumerate() {
            let event = chunk.unwrap();
            let json = serde_json::to_string(&event).unwrap();
            assert!(json.len() <= 16384);
            assert_eq!(event.kind, nostr_client_types::kind::FILE_CHUNK);
            if i < 5 {
                // every non-final chunk decodes back to exactly blockSize raw bytes
                let decoded = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &event.content).unwrap();
                assert_eq!(decoded.len(), 12027);
            }
            seen_ids.push(event.id.to_hex());
            emitted += 1;
        }
        assert_eq!(emitted, 6);
        assert_eq!(seen_ids, e_tags);
    }

    #[test]
    fn missing_mime_type_is_rejected() {
        let signer = signer();
        let mut blob = Cursor::new(vec![1u8, 2, 3]);
        let mut options = FileCodecOptions::new("f.bin", "x/y", 16384);
        options.mime_type = None;
        let err = plan(&mut blob, 3, &signer, &options).unwrap_err();
        assert!(matches!(err, FileCodecError::MissingMimeType));
    }

    #[test]
    fn single_chunk_file_has_no_block_size_tag() {
        let signer = signer();
        let mut blob = Cursor::new(vec![7u8; 10]);
        let options = FileCodecOptions::new("tiny.bin", "application/octet-stream", 16384);
        let plan = plan(&mut blob, 10, &signer, &options).unwrap();
        assert_eq!(plan.num_chunks(), 1);
        assert!(!plan.metadata_event.tags.iter().any(|t| t[0] == "blockSize"));
    }
}
