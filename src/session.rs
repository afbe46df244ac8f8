//! Session — the signaling bus as seen by one participant.
//!
//! DESIGN
//! ======
//! A session is scoped to one live connection. Handlers are registered per
//! event name and invoked synchronously, one at a time, in delivery order.
//! There is no unsubscribe: handlers live as long as the session does.

use std::sync::Arc;

use crate::signal::{OutboundSignal, SignalError, SignalEvent};

/// Callback invoked for each delivered signal.
pub type SignalHandler = Arc<dyn Fn(&SignalEvent) + Send + Sync>;

/// Reliable, ordered, broadcast pub/sub channel for one connection.
pub trait Session: Send + Sync {
    /// Identifier of this participant's own connection.
    fn connection_id(&self) -> &str;

    /// Register `handler` for every signal dispatched under `event`.
    fn on(&self, event: &str, handler: SignalHandler);

    /// Publish a signal. Broadcast signals are echoed back to the sender.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Closed`] once the connection has left the bus.
    fn send_signal(&self, signal: OutboundSignal) -> Result<(), SignalError>;

    fn is_my_own_connection(&self, connection_id: &str) -> bool {
        self.connection_id() == connection_id
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
