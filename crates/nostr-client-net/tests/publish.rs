//! Publish semantics: a relay's `OK` reply whose message starts with
//! `duplicate:` is treated as success even when `accepted` is false, and
//! any other rejection surfaces as an error.

mod common;

use nostr_client_codec::{ClientMessage, RelayMessage};
use nostr_client_crypto::sign_event;
use nostr_client_net::{RelayConnection, RelayError};
use nostr_client_types::{SecretKey, UnsignedEvent};

use common::MockRelay;

fn signed_test_event() -> nostr_client_types::Event {
    let sk = SecretKey::from_hex("f5dfe77a89298142e2d464ca4368485c8b23825c082ff69be80538f980c403dc").unwrap();
    sign_event(&sk, UnsignedEvent::new(1, "hi", vec![], 1_700_000_000)).unwrap()
}

#[tokio::test]
async fn duplicate_reply_is_treated_as_success() {
    let relay = MockRelay::start(|msg| {
        let ClientMessage::Event { event } = msg else {
            return vec![];
        };
        vec![RelayMessage::Ok { event_id: event.id, accepted: false, message: "duplicate: already have this event".into() }.to_json()]
    })
    .await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let outcome = conn.publish(signed_test_event()).await.unwrap();
    assert!(outcome.is_duplicate);
}

#[tokio::test]
async fn genuine_rejection_is_an_error() {
    let relay = MockRelay::start(|msg| {
        let ClientMessage::Event { event } = msg else {
            return vec![];
        };
        vec![RelayMessage::Ok { event_id: event.id, accepted: false, message: "blocked: spam".into() }.to_json()]
    })
    .await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let err = conn.publish(signed_test_event()).await.unwrap_err();
    assert!(matches!(err, RelayError::PublishRejected(message) if message == "blocked: spam"));
}

#[tokio::test]
async fn accepted_reply_is_not_a_duplicate() {
    let relay = MockRelay::start(|msg| {
        let ClientMessage::Event { event } = msg else {
            return vec![];
        };
        vec![RelayMessage::Ok { event_id: event.id, accepted: true, message: "".into() }.to_json()]
    })
    .await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let outcome = conn.publish(signed_test_event()).await.unwrap();
    assert!(!outcome.is_duplicate);
}
