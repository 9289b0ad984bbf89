use std::path::Path;

use nostr_client_collector::Collector;
use nostr_client_config::Config;

use crate::error::CliError;

/// Backs both the `copy` and `collect` subcommands (`collect` is `copy`'s
/// alias).
pub async fn run(config_path: &Path, profile_name: &str) -> Result<(), CliError> {
    let config = Config::load(config_path)?;
    let profile = config.resolve_profile(profile_name)?;
    let report = Collector::new(profile).run().await?;
    println!("events published:   {}", report.events_published);
    println!("profiles published: {}", report.profiles_published);
    Ok(())
}
