use crate::bech32_codec;
use crate::error::CliError;

pub fn run(value: &str) -> Result<(), CliError> {
    let decoded = bech32_codec::decode(value)?;
    println!("{}\t{}", decoded.hrp, decoded.hex);
    Ok(())
}
