//! Dropping a `QueryStream` must close its subscription: send `CLOSE` to the
//! relay rather than leaving it open.

mod common;

use nostr_client_net::RelayConnection;
use nostr_client_types::Filter;

use common::MockRelay;

#[tokio::test]
async fn dropping_the_stream_sends_close() {
    let mut relay = MockRelay::start(|_| vec![]).await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let stream = conn.query(vec![Filter::new()]).await.unwrap();

    let req_frame = relay.recv_client_frame().await;
    assert!(req_frame.starts_with("[\"REQ\""));

    drop(stream);

    let close_frame = relay.recv_client_frame().await;
    assert!(close_frame.starts_with("[\"CLOSE\""));
}
