use nostr_client_net::RelayConnection;
use nostr_client_types::Filter;

use crate::error::CliError;

pub async fn run(relay: &str, filter_json: &str, limit: Option<u64>) -> Result<(), CliError> {
    let filter: Filter = serde_json::from_str(filter_json)?;
    let conn = RelayConnection::connect(relay.to_string()).await?;
    let mut stream = conn.query_saved(filter, limit);

    let mut count: u64 = 0;
    while let Some(event) = stream.next().await {
        println!("{}", serde_json::to_string(&event).expect("Event always serializes"));
        count += 1;
    }
    eprintln!("-- {count} event(s)");
    conn.close().await;
    Ok(())
}
