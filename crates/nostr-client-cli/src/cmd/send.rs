use std::time::{SystemTime, UNIX_EPOCH};

use nostr_client_crypto::Signer;
use nostr_client_net::RelayConnection;
use nostr_client_types::{SecretKey, UnsignedEvent};

use crate::error::CliError;

pub async fn run(relay: &str, seckey_hex: &str, kind: u16, content: &str, tags: Vec<Vec<String>>) -> Result<(), CliError> {
    let seckey = SecretKey::from_hex(seckey_hex)?;
    let unsigned = UnsignedEvent::new(kind, content, tags, now_unix());
    let event = seckey.sign(unsigned)?;

    let conn = RelayConnection::connect(relay.to_string()).await?;
    let outcome = conn.publish(event.clone()).await?;
    println!("{}", serde_json::to_string(&event).expect("Event always serializes"));
    if outcome.is_duplicate {
        eprintln!("relay already had this event");
    }
    conn.close().await;
    Ok(())
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the Unix epoch")
        .as_secs() as i64
}
