use nostr_client_crypto::generate_keypair;

use crate::bech32_codec;
use crate::cli::Nip19Kind;
use crate::error::CliError;

pub fn run() -> Result<(), CliError> {
    let (seckey, pubkey) = generate_keypair();
    let seckey_hex = seckey.to_hex();
    let pubkey_hex = pubkey.to_hex();
    println!("seckey: {seckey_hex}");
    println!("pubkey: {pubkey_hex}");
    println!("nsec:   {}", bech32_codec::encode(Nip19Kind::Nsec, &seckey_hex)?);
    println!("npub:   {}", bech32_codec::encode(Nip19Kind::Npub, &pubkey_hex)?);
    Ok(())
}
