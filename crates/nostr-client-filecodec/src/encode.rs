use std::io::{Read, Seek, SeekFrom};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use nostr_client_crypto::{compute_event_id, Signer, StreamHasher};
use nostr_client_types::{kind, Event, EventId, UnsignedEvent};

use crate::chunker::{chunk_ranges, chunk_size_for};
use crate::error::FileCodecError;

/// An opaque random-access byte blob: a local file in the CLI, an in-memory
/// `Cursor` in tests.
pub trait SeekRead: Read + Seek {}
impl<T: Read + Seek> SeekRead for T {}

/// Inputs to a NIP-95 encode.
#[derive(Debug, Clone)]
pub struct FileCodecOptions {
    pub max_message_size: usize,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub alt: Option<String>,
    pub created_at: Option<i64>,
}

impl FileCodecOptions {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, max_message_size: usize) -> Self {
        Self {
            max_message_size,
            file_name: file_name.into(),
            mime_type: Some(mime_type.into()),
            description: None,
            alt: None,
            created_at: None,
        }
    }
}

/// The result of the chunker's first pass: the signed metadata event plus
/// everything the second pass needs to re-read and re-sign identical chunks.
/// The codec re-reads chunks from the blob on the second pass, so the
/// signer must be deterministic given `(template, created_at)`.
pub struct EncodePlan {
    pub metadata_event: Event,
    pub chunk_size: usize,
    pub total_size: u64,
    pub sha256_hex: String,
    ranges: Vec<(u64, u64)>,
    created_at: i64,
}

impl EncodePlan {
    pub fn num_chunks(&self) -> usize {
        self.ranges.len()
    }

    /// The second pass: re-reads `blob` from the start and re-signs each
    /// chunk in order, lazily. Every yielded id matches the corresponding
    /// `e` tag on `metadata_event`, since chunking and signing are both
    /// deterministic given `(template, created_at)`.
    pub fn chunk_events<'a>(&'a self, blob: &'a mut dyn SeekRead, signer: &'a dyn Signer) -> ChunkEvents<'a> {
        ChunkEvents {
            blob,
            signer,
            ranges: self.ranges.iter(),
            created_at: self.created_at,
            buf: vec![0u8; self.chunk_size.max(1)],
            seeked: false,
        }
    }
}

/// Lazily re-reads and re-signs chunk events from the blob, in emission
/// order.
pub struct ChunkEvents<'a> {
    blob: &'a mut dyn SeekRead,
    signer: &'a dyn Signer,
    ranges: std::slice::Iter<'a, (u64, u64)>,
    created_at: i64,
    buf: Vec<u8>,
    seeked: bool,
}

impl<'a> Iterator for ChunkEvents<'a> {
    type Item = Result<Event, FileCodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.seeked {
            self.seeked = true;
            if let Err(e) = self.blob.seek(SeekFrom::Start(0)) {
                return Some(Err(e.into()));
            }
        }
        let &(_, len) = self.ranges.next()?;
        let len = len as usize;
        Some(self.next_chunk(len))
    }
}

impl<'a> ChunkEvents<'a> {
    fn next_chunk(&mut self, len: usize) -> Result<Event, FileCodecError> {
        self.blob.read_exact(&mut self.buf[..len])?;
        let content = BASE64_STANDARD.encode(&self.buf[..len]);
        let unsigned = UnsignedEvent::new(kind::FILE_CHUNK, content, vec![], self.created_at);
        Ok(self.signer.sign(unsigned)?)
    }
}

/// First pass: reads `blob` once (`total_size` bytes) to compute the
/// whole-file SHA-256 and every chunk event's id, then builds and signs the
/// kind-1065 metadata event whose `e` tags name those ids in order.
pub fn plan(
    blob: &mut dyn SeekRead,
    total_size: u64,
    signer: &dyn Signer,
    options: &FileCodecOptions,
) -> Result<EncodePlan, FileCodecError> {
    let mime_type = options.mime_type.clone().ok_or(FileCodecError::MissingMimeType)?;
    let chunk_size = chunk_size_for(options.max_message_size)?;
    let ranges = chunk_ranges(total_size, chunk_size);
    let created_at = options.created_at.unwrap_or_else(now_unix);
    let pubkey = signer.public_key()?;

    let mut hasher = StreamHasher::new();
    let mut chunk_ids: Vec<EventId> = Vec::with_capacity(ranges.len());
    blob.seek(SeekFrom::Start(0))?;
    let mut buf = vec![0u8; chunk_size.max(1)];
    for &(_, len) in &ranges {
        let len = len as usize;
        blob.read_exact(&mut buf[..len])?;
        hasher.update(&buf[..len]);
        let content = BASE64_STANDARD.encode(&buf[..len]);
        let id = compute_event_id(&pubkey, created_at, kind::FILE_CHUNK, &[], &content);
        chunk_ids.push(id);
    }
    let sha256_hex = hasher.finalize_hex();

    let mut tags = vec![
        vec!["name".to_string(), options.file_name.clone()],
        vec!["m".to_string(), mime_type],
        vec!["x".to_string(), sha256_hex.clone()],
        vec!["fileName".to_string(), options.file_name.clone()],
        vec!["size".to_string(), total_size.to_string()],
    ];
    if ranges.len() > 1 {
        tags.push(vec!["blockSize".to_string(), chunk_size.to_string()]);
    }
    for id in &chunk_ids {
        tags.push(vec!["e".to_string(), id.to_hex()]);
    }
    if let Some(alt) = &options.alt {
        tags.push(vec!["alt".to_string(), alt.clone()]);
    }

    let metadata_unsigned =
        UnsignedEvent::new(kind::FILE_METADATA, options.description.clone().unwrap_or_default(), tags, created_at);
    let metadata_event = signer.sign(metadata_unsigned)?;

    Ok(EncodePlan { metadata_event, chunk_size, total_size, sha256_hex, ranges, created_at })
}

fn now_unix() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock is after the Unix epoch").as_secs() as i64
}
