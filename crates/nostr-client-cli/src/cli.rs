use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// A Nostr relay-protocol client and social-graph replication tool.
#[derive(Parser)]
#[command(name = "nostr-client", version, about = "A Nostr relay-protocol client and social-graph replication tool")]
pub struct Cli {
    /// Path to the TOML config file (default: ~/.config/nostr-client/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose (debug-level) logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a NIP-19 bech32 string (npub/nsec/note) to its hex payload.
    Decode {
        /// The bech32 string to decode.
        value: String,
    },
    /// Encode a 64-hex-char value as a NIP-19 bech32 string.
    Lookup {
        /// Which kind of bech32 string to produce.
        #[arg(value_enum)]
        kind: Nip19Kind,
        /// The 64-hex-char value to encode.
        hex_value: String,
    },
    /// Generate a fresh secp256k1 keypair.
    Generate,
    /// Run a named collector profile: copy a pubkey's social graph from its
    /// source relays to its destination relay.
    Copy {
        /// Profile name from the config file.
        profile: String,
    },
    /// Alias for `copy`.
    Collect {
        /// Profile name from the config file.
        profile: String,
    },
    /// Fetch every event matching a filter from a relay (paging across any
    /// server-side cap).
    Query {
        /// Relay WebSocket URL.
        relay: String,
        /// A NIP-01 filter, as a JSON object.
        filter_json: String,
        /// Stop after this many events.
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Fetch and print a relay's NIP-11 information document.
    Info {
        /// Relay WebSocket URL (scheme is rewritten to http(s) for the fetch).
        relay: String,
    },
    /// Sign and publish one event to a relay.
    Send {
        /// Relay WebSocket URL.
        relay: String,
        /// 64-hex-char secret key to sign with.
        #[arg(long)]
        seckey: String,
        /// Event kind.
        #[arg(long, default_value_t = 1)]
        kind: u16,
        /// Event content.
        #[arg(long, default_value = "")]
        content: String,
        /// A tag, given as `name:value[:value...]`; may be repeated.
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<Vec<String>>,
    },
    /// NIP-95 file chunking and listing.
    #[command(subcommand)]
    File(FileCommands),
}

#[derive(Subcommand)]
pub enum FileCommands {
    /// Chunk a file into a NIP-95 metadata event plus signed chunk events
    /// and publish them to a relay.
    Upload {
        /// Path to the file to upload.
        path: PathBuf,
        /// Relay WebSocket URL to publish to.
        relay: String,
        /// 64-hex-char secret key to sign with.
        #[arg(long)]
        seckey: String,
        /// MIME type (guessed from the file extension if omitted).
        #[arg(long)]
        mime: Option<String>,
        /// Largest JSON-encoded event size a chunk may reach.
        #[arg(long, default_value_t = 16384)]
        max_message_size: usize,
        /// Optional `alt` tag describing the file.
        #[arg(long)]
        alt: Option<String>,
    },
    /// List kind-1065 file-metadata events authored by a pubkey.
    Ls {
        /// Relay WebSocket URL.
        relay: String,
        /// 64-hex-char author pubkey.
        pubkey: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Nip19Kind {
    Npub,
    Nsec,
    Note,
}

fn parse_tag(s: &str) -> Result<Vec<String>, String> {
    let parts: Vec<String> = s.split(':').map(str::to_string).collect();
    if parts.len() < 2 {
        return Err("a --tag must have at least a name and one value, e.g. e:<hex>".to_string());
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_with_repeated_tags() {
        let cli = Cli::try_parse_from([
            "nostr-client",
            "send",
            "wss://relay.example",
            "--seckey",
            &"11".repeat(32),
            "--content",
            "hi",
            "--tag",
            "e:deadbeef",
            "--tag",
            "p:cafebabe",
        ])
        .unwrap();
        match cli.command {
            Commands::Send { tags, content, .. } => {
                assert_eq!(content, "hi");
                assert_eq!(tags, vec![vec!["e".to_string(), "deadbeef".to_string()], vec![
                    "p".to_string(),
                    "cafebabe".to_string()
                ]]);
            }
            _ => panic!("expected Send"),
        }
    }

    #[test]
    fn file_upload_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "nostr-client",
            "file",
            "upload",
            "photo.jpg",
            "wss://relay.example",
            "--seckey",
            &"22".repeat(32),
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::File(FileCommands::Upload { .. })));
    }
}
