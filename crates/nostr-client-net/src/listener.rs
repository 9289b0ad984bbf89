/// Hooks a caller can install on a [`crate::connection::RelayConnection`] to
/// observe every frame crossing the wire without going through a
/// subscription. Exceptions (panics aside) from a listener must never break
/// protocol flow for other listeners or for subscriptions, so the
/// connection's dispatch loop swallows whatever a hook returns.
pub trait ConnectionListener: Send + Sync {
    fn sent_message(&self, _raw: &str) {}
    fn got_message(&self, _raw: &str) {}
    fn connection_closed(&self) {}
}
