use k256::schnorr::signature::{Signer, Verifier};
use k256::schnorr::{Signature, SigningKey, VerifyingKey};

use nostr_client_types::{Event, EventId, PublicKey, SecretKey, UnsignedEvent};

use crate::error::CryptoError;
use crate::hash::compute_event_id;

/// Derives the x-only public key for a secret key.
pub fn derive_public_key(secret_key: &SecretKey) -> Result<PublicKey, CryptoError> {
    let signing_key = SigningKey::from_bytes(secret_key.as_bytes())
        .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
    let verifying_key = signing_key.verifying_key();
    Ok(PublicKey::from_bytes(verifying_key.to_bytes().into()))
}

/// Generates a fresh random keypair.
pub fn generate_keypair() -> (SecretKey, PublicKey) {
    let signing_key = SigningKey::random(&mut rand::thread_rng());
    let secret_key = SecretKey::from_bytes(signing_key.to_bytes().into());
    let public_key = PublicKey::from_bytes(signing_key.verifying_key().to_bytes().into());
    (secret_key, public_key)
}

/// Signs an unsigned event, producing a fully-formed `Event` with its id and
/// signature populated: compute the id, sign its bytes directly (schnorr
/// signs a 32-byte message with no additional hashing), then self-verify
/// before returning.
pub fn sign_event(secret_key: &SecretKey, unsigned: UnsignedEvent) -> Result<Event, CryptoError> {
    unsigned
        .tags
        .iter()
        .try_for_each(|t| if t.is_empty() { Err(CryptoError::SigningFailed("empty tag".into())) } else { Ok(()) })?;

    let pubkey = derive_public_key(secret_key)?;
    let id = compute_event_id(&pubkey, unsigned.created_at, unsigned.kind, &unsigned.tags, &unsigned.content);

    let signing_key = SigningKey::from_bytes(secret_key.as_bytes())
        .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
    let signature: Signature = signing_key
        .try_sign(id.as_bytes())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    let event = Event {
        id,
        pubkey,
        created_at: unsigned.created_at,
        kind: unsigned.kind,
        tags: unsigned.tags,
        content: unsigned.content,
        sig: hex::encode(signature.to_bytes()),
    };

    verify_event_signature(&event)?;
    Ok(event)
}

/// An abstraction over secret-key custody that produces signed events. This
/// core only ships the local-key variant, but callers needing a remote
/// signer (NIP-46, a hardware key) can implement this trait themselves
/// without touching `nostr-client-filecodec` or `nostr-client-collector`,
/// both of which take `&dyn Signer` rather than a concrete key type.
///
/// The NIP-95 two-pass chunker requires signing to be deterministic given
/// `(template, created_at)`; `SecretKey`'s impl below satisfies this
/// because BIP-340 signing here uses no auxiliary randomness beyond what's
/// already fixed by the message and key.
pub trait Signer: Send + Sync {
    fn sign(&self, unsigned: UnsignedEvent) -> Result<Event, CryptoError>;
    fn public_key(&self) -> Result<PublicKey, CryptoError>;
}

impl Signer for SecretKey {
    fn sign(&self, unsigned: UnsignedEvent) -> Result<Event, CryptoError> {
        sign_event(self, unsigned)
    }

    fn public_key(&self) -> Result<PublicKey, CryptoError> {
        derive_public_key(self)
    }
}

/// Verifies that `event.sig` is a valid schnorr signature over `event.id`
/// by `event.pubkey`, and that `event.id` matches the event's own fields.
pub fn verify_event_signature(event: &Event) -> Result<(), CryptoError> {
    let expected_id = compute_event_id(&event.pubkey, event.created_at, event.kind, &event.tags, &event.content);
    if expected_id != event.id {
        return Err(CryptoError::IdMismatch);
    }

    let verifying_key = VerifyingKey::from_bytes(event.pubkey.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    let sig_bytes = hex::decode(&event.sig).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let signature =
        Signature::try_from(sig_bytes.as_slice()).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

    verifying_key
        .verify(event.id.as_bytes(), &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Boolean-returning form of [`verify_event_signature`] for callers on the
/// query-consuming path: a relay serving an event it never verified is not
/// this client's problem, so verification failure here is a `false`, never
/// a thrown error, and stream processing continues.
pub fn verify(event: &Event) -> bool {
    verify_event_signature(event).is_ok()
}
