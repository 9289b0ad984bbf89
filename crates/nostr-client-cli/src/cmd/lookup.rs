use crate::bech32_codec;
use crate::cli::Nip19Kind;
use crate::error::CliError;

pub fn run(kind: Nip19Kind, hex_value: &str) -> Result<(), CliError> {
    println!("{}", bech32_codec::encode(kind, hex_value)?);
    Ok(())
}
