use crate::error::CliError;
use crate::nip11;

pub async fn run(relay: &str) -> Result<(), CliError> {
    let info = nip11::fetch(relay).await?;
    println!("{}", serde_json::to_string_pretty(&info).expect("RelayInfo always serializes"));
    Ok(())
}
