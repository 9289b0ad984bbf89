use std::fs::File;
use std::path::Path;

use nostr_client_filecodec::{plan, FileCodecError, FileCodecOptions};
use nostr_client_net::RelayConnection;
use nostr_client_types::{kind, Filter, PublicKey, SecretKey};

use crate::error::CliError;
use crate::mime;

/// Chunks a file into a NIP-95 metadata event plus chunk events, and
/// publishes all of them to `relay`.
pub async fn upload(
    path: &Path,
    relay: &str,
    seckey_hex: &str,
    mime_type: Option<String>,
    max_message_size: usize,
    alt: Option<String>,
) -> Result<(), CliError> {
    let seckey = SecretKey::from_hex(seckey_hex)?;
    let mime_type = mime_type
        .or_else(|| mime::guess_mime_type(path))
        .ok_or(FileCodecError::MissingMimeType)?;

    let mut blob = File::open(path)?;
    let total_size = blob.metadata()?.len();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    let mut options = FileCodecOptions::new(file_name, mime_type, max_message_size);
    options.alt = alt;

    let encoded = plan(&mut blob, total_size, &seckey, &options)?;

    let conn = RelayConnection::connect(relay.to_string()).await?;
    conn.publish(encoded.metadata_event.clone()).await?;
    println!("metadata: {}", encoded.metadata_event.id);

    let mut published: usize = 0;
    for chunk in encoded.chunk_events(&mut blob, &seckey) {
        let event = chunk?;
        conn.publish(event).await?;
        published += 1;
    }
    println!("chunks published: {published}/{}", encoded.num_chunks());
    conn.close().await;
    Ok(())
}

/// Lists kind-1065 file-metadata events authored by `pubkey_hex`.
pub async fn ls(relay: &str, pubkey_hex: &str) -> Result<(), CliError> {
    let pubkey = PublicKey::from_hex(pubkey_hex)?;
    let conn = RelayConnection::connect(relay.to_string()).await?;
    let filter = Filter::new().authors(vec![pubkey]).kinds(vec![kind::FILE_METADATA]);
    let mut stream = conn.query_saved(filter, None);

    let mut count: u64 = 0;
    while let Some(event) = stream.next().await {
        let name = tag_value(&event.tags, "fileName").unwrap_or("?");
        let size = tag_value(&event.tags, "size").unwrap_or("?");
        println!("{}  {name}  {size} bytes", event.id);
        count += 1;
    }
    eprintln!("-- {count} file(s)");
    conn.close().await;
    Ok(())
}

fn tag_value<'a>(tags: &'a [Vec<String>], name: &str) -> Option<&'a str> {
    tags.iter().find(|t| t.first().map(String::as_str) == Some(name)).and_then(|t| t.get(1)).map(String::as_str)
}
