//! A subscription's stream must observe end-of-stream — not hang forever —
//! when the relay sends `CLOSED`, and when the connection itself closes.

mod common;

use nostr_client_codec::{ClientMessage, RelayMessage};
use nostr_client_net::{RelayConnection, RelayError};
use nostr_client_types::Filter;

use common::MockRelay;

#[tokio::test]
async fn closed_message_is_delivered_then_the_stream_ends() {
    let relay = MockRelay::start(|msg| {
        let ClientMessage::Req { sub_id, .. } = msg else {
            return vec![];
        };
        vec![RelayMessage::Closed { sub_id, message: "error: shutting down".into() }.to_json()]
    })
    .await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let mut stream = conn.query(vec![Filter::new()]).await.unwrap();

    match stream.next().await {
        Some(RelayMessage::Closed { message, .. }) => assert_eq!(message, "error: shutting down"),
        other => panic!("expected Closed, got {other:?}"),
    }
    assert!(stream.next().await.is_none(), "stream must end after CLOSED, not hang");
}

#[tokio::test]
async fn connection_close_ends_a_live_query_stream() {
    let mut relay = MockRelay::start(|_| vec![]).await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let mut stream = conn.query(vec![Filter::new()]).await.unwrap();
    relay.recv_client_frame().await;

    relay.close();
    conn.close().await;

    assert!(stream.next().await.is_none(), "stream must end when the connection closes, not hang");
}

#[tokio::test]
async fn query_count_errors_instead_of_hanging_when_connection_closes_first() {
    let mut relay = MockRelay::start(|_| vec![]).await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let count_task = tokio::spawn({
        let conn = conn.clone();
        async move { conn.query_count(vec![Filter::new()]).await }
    });

    let frame = relay.recv_client_frame().await;
    assert!(frame.starts_with("[\"COUNT\""));

    relay.close();
    conn.close().await;

    let err = count_task.await.unwrap().unwrap_err();
    assert!(matches!(err, RelayError::ProtocolError(_)));
}
