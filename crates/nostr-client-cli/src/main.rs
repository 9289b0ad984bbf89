mod bech32_codec;
mod cli;
mod cmd;
mod error;
mod mime;
mod nip11;

use std::path::PathBuf;

use clap::Parser;

use cli::{Cli, Commands, FileCommands};

fn init_tracing(debug: bool) {
    let filter = if debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nostr-client")
        .join("config.toml")
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match cli.command {
        Commands::Decode { value } => cmd::decode::run(&value)?,
        Commands::Lookup { kind, hex_value } => cmd::lookup::run(kind, &hex_value)?,
        Commands::Generate => cmd::generate::run()?,
        Commands::Copy { profile } | Commands::Collect { profile } => {
            cmd::collect::run(&config_path, &profile).await?
        }
        Commands::Query { relay, filter_json, limit } => cmd::query::run(&relay, &filter_json, limit).await?,
        Commands::Info { relay } => cmd::info::run(&relay).await?,
        Commands::Send { relay, seckey, kind, content, tags } => {
            cmd::send::run(&relay, &seckey, kind, &content, tags).await?
        }
        Commands::File(FileCommands::Upload { path, relay, seckey, mime, max_message_size, alt }) => {
            cmd::file::upload(&path, &relay, &seckey, mime, max_message_size, alt).await?
        }
        Commands::File(FileCommands::Ls { relay, pubkey }) => cmd::file::ls(&relay, &pubkey).await?,
    }

    Ok(())
}
