use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use nostr_client_async::{Completion, CompletionHandle};
use nostr_client_codec::{ClientMessage, RelayMessage};
use nostr_client_types::{Event, Filter};

use crate::error::RelayError;
use crate::listener::ConnectionListener;
use crate::subscription::{Subscription, SubscriptionState};
use crate::types::{validate_relay_url, ConnectionStatus};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

/// Outcome of a successful `publish`.
#[derive(Debug, Clone, Copy)]
pub struct PublishOutcome {
    pub is_duplicate: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TryPublishOutcome {
    pub published: bool,
    pub is_duplicate: bool,
    pub had_error: bool,
}

/// One WebSocket carrying the client<->relay protocol. Owns the socket, the
/// subscription registry, and the listener list; mutated only by its own
/// task and by callers awaiting its async methods, which serialize through
/// its internal mutexes rather than a single logical execution context.
pub struct RelayConnection {
    url: String,
    status_tx: watch::Sender<ConnectionStatus>,
    status_rx: watch::Receiver<ConnectionStatus>,
    sink: Mutex<Option<WsSink>>,
    registry: Mutex<HashMap<String, Arc<Subscription>>>,
    next_sub_id: AtomicU64,
    listeners: RwLock<Vec<Arc<dyn ConnectionListener>>>,
    publish_waiters: Mutex<HashMap<String, CompletionHandle<(bool, String)>>>,
}

impl RelayConnection {
    /// Connects to `url` and spawns the reader task. No background
    /// reconnect-on-failure loop: a connection's lifetime is connect-once,
    /// close-once, so a dropped socket is a terminal `Failed` status rather
    /// than something the connection retries behind the caller's back.
    pub async fn connect(url: impl Into<String>) -> Result<Arc<Self>, RelayError> {
        let url = url.into();
        validate_relay_url(&url)?;

        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);

        let (ws_stream, _response) = tokio_tungstenite::connect_async(&url)
            .await
            .map_err(|e| RelayError::WebSocketError(e.to_string()))?;
        let (sink, stream) = ws_stream.split();

        let conn = Arc::new(Self {
            url,
            status_tx,
            status_rx,
            sink: Mutex::new(Some(sink)),
            registry: Mutex::new(HashMap::new()),
            next_sub_id: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
            publish_waiters: Mutex::new(HashMap::new()),
        });

        conn.status_tx.send_replace(ConnectionStatus::Connected);
        conn.spawn_reader(stream);

        Ok(conn)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    fn spawn_reader(self: &Arc<Self>, mut stream: futures_util::stream::SplitStream<WsStream>) {
        let conn = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(WsMessage::Text(text)) => {
                        conn.handle_inbound(&text).await;
                    }
                    Ok(WsMessage::Close(_)) => break,
                    Ok(_) => {
                        tracing::warn!(relay = %conn.url, "ignoring non-text frame");
                    }
                    Err(e) => {
                        tracing::error!(relay = %conn.url, error = %e, "websocket read error");
                        break;
                    }
                }
            }
            conn.finish_closed().await;
        });
    }

    async fn handle_inbound(self: &Arc<Self>, raw: &str) {
        let message = match RelayMessage::from_json(raw) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(relay = %self.url, error = %e, raw, "unparseable relay frame; closing connection");
                self.close().await;
                return;
            }
        };

        if let RelayMessage::Notice { message } = &message {
            tracing::warn!(relay = %self.url, %message, "relay NOTICE");
        }

        match &message {
            RelayMessage::Event { sub_id, .. } | RelayMessage::Eose { sub_id } | RelayMessage::Count { sub_id, .. } => {
                if let Some(sub) = self.registry.lock().await.get(sub_id).cloned() {
                    sub.deliver(message.clone());
                }
            }
            RelayMessage::Closed { sub_id, .. } => {
                let removed = self.registry.lock().await.remove(sub_id);
                if let Some(sub) = removed {
                    // Deliver the CLOSED message before closing the channel:
                    // the consumer must still see it before end-of-stream.
                    sub.deliver(message.clone());
                    sub.mark_remotely_closed();
                }
            }
            RelayMessage::Ok { event_id, accepted, message: reason } => {
                let id_hex = event_id.to_hex();
                if let Some(handle) = self.publish_waiters.lock().await.remove(&id_hex) {
                    handle.resolve((*accepted, reason.clone()));
                }
            }
            RelayMessage::Notice { .. } => {}
        }

        let listeners = self.listeners.read().await.clone();
        for listener in listeners.iter() {
            listener.got_message(raw);
        }
    }

    async fn finish_closed(self: &Arc<Self>) {
        self.status_tx.send_replace(ConnectionStatus::Failed);
        for (_, sub) in self.registry.lock().await.drain() {
            sub.mark_remotely_closed();
        }
        self.publish_waiters.lock().await.clear();
        let listeners = self.listeners.read().await.clone();
        for listener in listeners.iter() {
            listener.connection_closed();
        }
    }

    async fn wait_for_open(&self) -> Result<(), RelayError> {
        let mut rx = self.status_rx.clone();
        loop {
            match *rx.borrow() {
                ConnectionStatus::Connected => return Ok(()),
                ConnectionStatus::Failed | ConnectionStatus::Closed => return Err(RelayError::ConnectionNotOpen),
                ConnectionStatus::Connecting => {}
            }
            if rx.changed().await.is_err() {
                return Err(RelayError::ConnectionClosed);
            }
        }
    }

    pub(crate) async fn send_client_message(&self, message: &ClientMessage) -> Result<(), RelayError> {
        self.wait_for_open().await?;
        let raw = message.to_json();
        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or(RelayError::ConnectionNotOpen)?;
        sink.send(WsMessage::Text(raw.clone()))
            .await
            .map_err(|e| RelayError::WebSocketError(e.to_string()))?;
        drop(guard);
        let listeners = self.listeners.read().await.clone();
        for listener in listeners.iter() {
            listener.sent_message(&raw);
        }
        Ok(())
    }

    fn allocate_sub_id(&self) -> String {
        self.next_sub_id.fetch_add(1, Ordering::SeqCst).to_string()
    }

    /// Allocates a subscription, sends `REQ`, and returns a stream that
    /// yields `EVENT`/`EOSE`/`CLOSED`/`COUNT` messages for it until the
    /// channel closes. Dropping the returned stream closes the
    /// subscription.
    pub async fn query(self: &Arc<Self>, filters: Vec<Filter>) -> Result<QueryStream, RelayError> {
        let sub_id = self.allocate_sub_id();
        let (tx, rx) = nostr_client_async::channel::<RelayMessage>();
        let subscription = Subscription::new(sub_id.clone(), tx, Arc::downgrade(self));
        self.registry.lock().await.insert(sub_id.clone(), subscription.clone());

        if let Err(e) = self.send_client_message(&ClientMessage::Req { sub_id: sub_id.clone(), filters }).await {
            self.registry.lock().await.remove(&sub_id);
            return Err(e);
        }

        Ok(QueryStream { subscription, receiver: rx })
    }

    pub(crate) async fn close_subscription(self: &Arc<Self>, sub_id: &str) {
        self.registry.lock().await.remove(sub_id);
        let _ = self
            .send_client_message(&ClientMessage::Close { sub_id: sub_id.to_string() })
            .await;
    }

    /// The paging engine: reissues `REQ` with a strictly decreasing `until`
    /// bound until a page yields at most one event or `requested_limit` is
    /// reached. Does not deduplicate across pages.
    pub fn query_saved(self: &Arc<Self>, filter: Filter, requested_limit: Option<u64>) -> SavedEventStream {
        let (tx, rx) = nostr_client_async::channel::<Event>();
        let conn = Arc::clone(self);
        tokio::spawn(async move {
            let limit = requested_limit.unwrap_or(u64::MAX);
            let mut yielded: u64 = 0;
            let mut current_filter = filter;

            loop {
                let mut stream = match conn.query(vec![current_filter.clone()]).await {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::error!(relay = %conn.url, error = %e, "querySaved: page request failed");
                        return;
                    }
                };

                let mut batch_count: u64 = 0;
                let mut min_created_at: Option<i64> = None;
                let mut exhausted = false;

                loop {
                    match stream.next().await {
                        Some(RelayMessage::Event { event, .. }) => {
                            min_created_at = Some(min_created_at.map_or(event.created_at, |m| m.min(event.created_at)));
                            batch_count += 1;
                            yielded += 1;
                            if tx.send(event).is_err() {
                                return;
                            }
                            if yielded >= limit {
                                if yielded > limit {
                                    tracing::warn!(relay = %conn.url, "querySaved: relay delivered more than requestedLimit");
                                }
                                return;
                            }
                        }
                        Some(RelayMessage::Eose { .. }) => break,
                        Some(RelayMessage::Closed { .. }) | None => {
                            exhausted = true;
                            break;
                        }
                        Some(_) => {}
                    }
                }
                drop(stream);

                if exhausted || batch_count <= 1 {
                    break;
                }
                let until = min_created_at.expect("batch_count>1 implies at least one tracked timestamp") - 1;
                current_filter = current_filter.with_until(until);
            }
        });
        SavedEventStream { receiver: rx }
    }

    pub async fn query_one(self: &Arc<Self>, filter: Filter) -> Option<Event> {
        let mut stream = self.query_saved(filter.limit(1), Some(1));
        stream.next().await
    }

    pub async fn query_simple(self: &Arc<Self>, filter: Filter, requested_limit: Option<u64>) -> Vec<Event> {
        let mut stream = self.query_saved(filter, requested_limit);
        let mut out = Vec::new();
        while let Some(event) = stream.next().await {
            out.push(event);
        }
        out
    }

    /// Issues `COUNT` and returns the first `COUNT` reply's count. Callers
    /// are responsible for gating this on NIP-11 `supported_nips` containing
    /// 45 — this method doesn't know about relay info.
    pub async fn query_count(self: &Arc<Self>, filters: Vec<Filter>) -> Result<u64, RelayError> {
        let sub_id = self.allocate_sub_id();
        let (tx, mut rx) = nostr_client_async::channel::<RelayMessage>();
        let subscription = Subscription::new(sub_id.clone(), tx, Arc::downgrade(self));
        self.registry.lock().await.insert(sub_id.clone(), subscription.clone());

        if let Err(e) = self.send_client_message(&ClientMessage::Count { sub_id: sub_id.clone(), filters }).await {
            self.registry.lock().await.remove(&sub_id);
            return Err(e);
        }

        let result = loop {
            match rx.recv().await {
                Some(RelayMessage::Count { count, .. }) => break Ok(count),
                Some(RelayMessage::Closed { message, .. }) => {
                    break Err(RelayError::ProtocolError(format!("subscription closed before COUNT: {message}")))
                }
                Some(_) => continue,
                None => break Err(RelayError::ProtocolError("subscription ended without a COUNT reply".into())),
            }
        };
        self.registry.lock().await.remove(&sub_id);
        result
    }

    /// Publishes `event`, awaiting the relay's `OK` reply. A rejection whose
    /// message starts with `duplicate:` is treated as success.
    pub async fn publish(self: &Arc<Self>, event: Event) -> Result<PublishOutcome, RelayError> {
        let id_hex = event.id.to_hex();
        let (completion, handle) = Completion::new();
        self.publish_waiters.lock().await.insert(id_hex.clone(), handle);

        if let Err(e) = self.send_client_message(&ClientMessage::Event { event }).await {
            self.publish_waiters.lock().await.remove(&id_hex);
            return Err(e);
        }

        match completion.wait().await {
            Ok((accepted, message)) => {
                let is_duplicate = message.starts_with("duplicate:");
                if accepted || is_duplicate {
                    Ok(PublishOutcome { is_duplicate })
                } else {
                    Err(RelayError::PublishRejected(message))
                }
            }
            Err(_) => {
                self.publish_waiters.lock().await.remove(&id_hex);
                Err(RelayError::ConnectionClosed)
            }
        }
    }

    pub async fn try_publish(self: &Arc<Self>, event: Event) -> TryPublishOutcome {
        match self.publish(event).await {
            Ok(outcome) => TryPublishOutcome { published: true, is_duplicate: outcome.is_duplicate, had_error: false },
            Err(_) => TryPublishOutcome { published: false, is_duplicate: false, had_error: true },
        }
    }

    /// Idempotent close: tears down the socket, closes all live
    /// subscriptions, and resolves pending publishes with `ConnectionClosed`.
    pub async fn close(self: &Arc<Self>) {
        if matches!(self.status(), ConnectionStatus::Closed) {
            return;
        }
        self.status_tx.send_replace(ConnectionStatus::Closed);
        if let Some(mut sink) = self.sink.lock().await.take() {
            let _ = sink.close().await;
        }
        for (_, sub) in self.registry.lock().await.drain() {
            sub.mark_remotely_closed();
        }
        self.publish_waiters.lock().await.clear();
        let listeners = self.listeners.read().await.clone();
        for listener in listeners.iter() {
            listener.connection_closed();
        }
    }

    pub async fn register_listener(&self, listener: Arc<dyn ConnectionListener>) {
        self.listeners.write().await.push(listener);
    }
}

/// A live subscription's inbound message stream. Dropping it closes the
/// subscription and sends `CLOSE` to the relay.
pub struct QueryStream {
    subscription: Arc<Subscription>,
    receiver: nostr_client_async::Receiver<RelayMessage>,
}

impl QueryStream {
    pub async fn next(&mut self) -> Option<RelayMessage> {
        self.receiver.recv().await
    }

    pub fn state(&self) -> SubscriptionState {
        self.subscription.state()
    }
}

impl Drop for QueryStream {
    fn drop(&mut self) {
        let subscription = self.subscription.clone();
        tokio::spawn(async move {
            subscription.close().await;
        });
    }
}

/// The paged-query result: a flat stream of events with server-side `limit`
/// caps stitched transparently across pages.
pub struct SavedEventStream {
    receiver: nostr_client_async::Receiver<Event>,
}

impl SavedEventStream {
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}
