use std::sync::{Arc, Mutex as StdMutex, Weak};

use nostr_client_codec::RelayMessage;

use crate::connection::RelayConnection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Open,
    EoseSeen,
    Closed,
}

/// A local handle for one REQ/COUNT subscription. Holds only its id and a
/// weak back-reference to the owning connection — not a strong `Arc` — so
/// that a Connection's registry (which owns `Arc<Subscription>`) and a
/// Subscription's close path never form a reference cycle.
pub struct Subscription {
    pub id: String,
    state: StdMutex<SubscriptionState>,
    sender: nostr_client_async::Sender<RelayMessage>,
    connection: Weak<RelayConnection>,
}

impl Subscription {
    pub(crate) fn new(
        id: String,
        sender: nostr_client_async::Sender<RelayMessage>,
        connection: Weak<RelayConnection>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            state: StdMutex::new(SubscriptionState::Open),
            sender,
            connection,
        })
    }

    pub fn state(&self) -> SubscriptionState {
        *self.state.lock().unwrap()
    }

    /// Forwards a message to this subscription's channel, transitioning
    /// OPEN -> EOSE_SEEN on the first EOSE.
    pub(crate) fn deliver(&self, message: RelayMessage) {
        if matches!(message, RelayMessage::Eose { .. }) {
            let mut state = self.state.lock().unwrap();
            if *state == SubscriptionState::Open {
                *state = SubscriptionState::EoseSeen;
            }
        }
        let _ = self.sender.send(message);
    }

    /// Called by the connection when the relay itself sends CLOSED, or when
    /// the connection itself closes, before the subscription is removed
    /// from the registry — after this, a local `close()` is a no-op. Closes
    /// the channel so the `QueryStream`/`SavedEventStream` consumer's
    /// `recv()` drains whatever is queued and then observes end-of-stream,
    /// instead of awaiting forever.
    pub(crate) fn mark_remotely_closed(&self) {
        *self.state.lock().unwrap() = SubscriptionState::Closed;
        self.sender.close();
    }

    /// Closes this subscription locally: idempotent. Sends `CLOSE` to the
    /// relay and removes the id from the registry, unless the relay already
    /// closed it first. Also closes the channel (see `mark_remotely_closed`).
    pub async fn close(&self) {
        let was_open = {
            let mut state = self.state.lock().unwrap();
            let was_open = *state != SubscriptionState::Closed;
            *state = SubscriptionState::Closed;
            was_open
        };
        self.sender.close();
        if !was_open {
            return;
        }
        if let Some(conn) = self.connection.upgrade() {
            conn.close_subscription(&self.id).await;
        }
    }
}
