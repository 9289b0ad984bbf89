//! Paging across a relay's own per-REQ cap: `query_saved` must keep
//! reissuing `REQ` with a strictly decreasing `until` until a page yields
//! at most one event.

mod common;

use nostr_client_codec::{ClientMessage, RelayMessage};
use nostr_client_net::RelayConnection;
use nostr_client_types::Filter;

use common::{dummy_event, MockRelay};

#[tokio::test]
async fn query_saved_pages_across_a_two_event_server_cap() {
    let relay = MockRelay::start(|msg| {
        let ClientMessage::Req { sub_id, filters } = msg else {
            return vec![];
        };
        let until = filters.first().and_then(|f| f.until);
        let events = match until {
            None => vec![dummy_event(5, 5), dummy_event(4, 4)],
            Some(3) => vec![dummy_event(3, 3), dummy_event(2, 2)],
            Some(1) => vec![dummy_event(1, 1)],
            _ => vec![],
        };
        let mut lines: Vec<String> = events
            .into_iter()
            .map(|event| RelayMessage::Event { sub_id: sub_id.clone(), event }.to_json())
            .collect();
        lines.push(RelayMessage::Eose { sub_id }.to_json());
        lines
    })
    .await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let mut stream = conn.query_saved(Filter::new(), None);

    let mut created_ats = Vec::new();
    while let Some(event) = stream.next().await {
        created_ats.push(event.created_at);
    }

    assert_eq!(created_ats, vec![5, 4, 3, 2, 1]);
}

#[tokio::test]
async fn query_saved_stops_at_requested_limit_mid_page() {
    let relay = MockRelay::start(|msg| {
        let ClientMessage::Req { sub_id, filters } = msg else {
            return vec![];
        };
        let until = filters.first().and_then(|f| f.until);
        let events = match until {
            None => vec![dummy_event(3, 3), dummy_event(2, 2)],
            _ => vec![],
        };
        let mut lines: Vec<String> = events
            .into_iter()
            .map(|event| RelayMessage::Event { sub_id: sub_id.clone(), event }.to_json())
            .collect();
        lines.push(RelayMessage::Eose { sub_id }.to_json());
        lines
    })
    .await;

    let conn = RelayConnection::connect(relay.url.clone()).await.unwrap();
    let mut stream = conn.query_saved(Filter::new(), Some(1));

    let first = stream.next().await.unwrap();
    assert_eq!(first.created_at, 3);
    assert!(stream.next().await.is_none());
}
