use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use nostr_client_codec::ClientMessage;
use nostr_client_types::Event;

/// A loopback relay for integration tests: accepts one connection, exposes
/// every client frame it receives, and lets the test script canned replies.
pub struct MockRelay {
    pub url: String,
    incoming: mpsc::UnboundedReceiver<String>,
    outgoing: Option<mpsc::UnboundedSender<String>>,
}

impl MockRelay {
    /// Starts a relay that replies to every inbound frame with whatever
    /// `respond` returns (may be multiple lines, one frame per call).
    pub async fn start<F>(mut respond: F) -> Self
    where
        F: FnMut(ClientMessage) -> Vec<String> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let url = format!("ws://{addr}");

        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel::<String>();
        let (outgoing_tx, mut outgoing_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            let (mut sink, mut source) = ws.split();
            loop {
                tokio::select! {
                    msg = source.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let _ = incoming_tx.send(text.clone());
                                if let Ok(parsed) = ClientMessage::from_json(&text) {
                                    for reply in respond(parsed) {
                                        if sink.send(Message::Text(reply)).await.is_err() {
                                            return;
                                        }
                                    }
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => return,
                            _ => {}
                        }
                    }
                    out = outgoing_rx.recv() => {
                        match out {
                            Some(text) => {
                                if sink.send(Message::Text(text)).await.is_err() {
                                    return;
                                }
                            }
                            None => return,
                        }
                    }
                }
            }
        });

        Self { url, incoming: incoming_rx, outgoing: Some(outgoing_tx) }
    }

    pub fn send_raw(&self, raw: impl Into<String>) {
        if let Some(outgoing) = &self.outgoing {
            let _ = outgoing.send(raw.into());
        }
    }

    /// Drops the server's outbound sender, which makes the server task's
    /// `select!` observe `None` and return, closing the socket from this
    /// side without ever sending a reply.
    pub fn close(&mut self) {
        self.outgoing = None;
    }

    pub async fn recv_client_frame(&mut self) -> String {
        self.incoming.recv().await.expect("expected a client frame")
    }
}

pub fn dummy_event(index: u64, created_at: i64) -> Event {
    let pubkey_hex = "aa".repeat(32);
    let id_hex = format!("{index:064x}");
    serde_json::from_value(serde_json::json!({
        "id": id_hex,
        "pubkey": pubkey_hex,
        "created_at": created_at,
        "kind": 1,
        "tags": [],
        "content": "",
        "sig": "00".repeat(64),
    }))
    .unwrap()
}
