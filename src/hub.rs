//! In-memory signaling hub — one session's broadcast bus.
//!
//! ARCHITECTURE
//! ============
//! `SignalHub` holds the inbox sender of every connected participant.
//! `connect` returns a `HubConnection`, which implements [`Session`] and owns
//! a pump task draining its inbox into registered handlers.
//!
//! ORDERING
//! ========
//! Sends fan out under the hub lock, so every inbox sees signals in the same
//! order. Each pump invokes handlers one at a time, so handlers for one
//! connection never run concurrently. Broadcasts reach the sender too.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::session::{Session, SignalHandler};
use crate::signal::{OutboundSignal, SignalError, SignalEvent};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a random connection id of the form `con_<16 hex chars>`.
#[must_use]
pub fn generate_connection_id() -> String {
    let bytes: [u8; 8] = rand::rng().random();
    format!("con_{}", bytes_to_hex(&bytes))
}

// =============================================================================
// HUB
// =============================================================================

/// Shared bus for one session. Clone is cheap; clones share the same room.
#[derive(Clone, Default)]
pub struct SignalHub {
    /// Connected participants: `connection_id` -> inbox sender.
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<SignalEvent>>>>,
}

impl SignalHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new participant connection.
    ///
    /// Must be called from within a Tokio runtime; the connection's pump
    /// task is spawned onto it.
    #[must_use]
    pub fn connect(&self) -> HubConnection {
        let connection_id = generate_connection_id();
        let (tx, rx) = mpsc::unbounded_channel();
        let handlers: Arc<Mutex<HashMap<String, Vec<SignalHandler>>>> = Arc::default();

        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(connection_id.clone(), tx);

        let pump = tokio::spawn(run_pump(connection_id.clone(), rx, Arc::clone(&handlers)));
        info!(%connection_id, "hub: connection joined");

        HubConnection { connection_id, hub: self.clone(), handlers, pump }
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_connected(&self, connection_id: &str) -> bool {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(connection_id)
    }

    /// Fan a signal out from `from` to every addressed connection.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Closed`] if `from` is not attached to the hub.
    pub fn publish(&self, from: &str, signal: OutboundSignal) -> Result<(), SignalError> {
        // Write lock: concurrent senders must not interleave their fan-outs.
        let mut connections = self.connections.write().unwrap_or_else(PoisonError::into_inner);
        if !connections.contains_key(from) {
            return Err(SignalError::Closed(from.to_string()));
        }

        let recipients: Vec<String> = connections
            .keys()
            .filter(|id| signal.is_addressed_to(id))
            .cloned()
            .collect();
        let event = signal.into_event(from);
        debug!(%from, signal_type = %event.signal_type, recipients = recipients.len(), "hub: publish");

        for id in recipients {
            let delivered = connections
                .get(&id)
                .is_some_and(|tx| tx.send(event.clone()).is_ok());
            if !delivered {
                connections.remove(&id);
            }
        }
        Ok(())
    }

    fn remove(&self, connection_id: &str) -> bool {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(connection_id)
            .is_some()
    }
}

async fn run_pump(
    connection_id: String,
    mut rx: mpsc::UnboundedReceiver<SignalEvent>,
    handlers: Arc<Mutex<HashMap<String, Vec<SignalHandler>>>>,
) {
    while let Some(event) = rx.recv().await {
        // Snapshot the handler list so a handler may register more handlers.
        let targets = handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.event_name())
            .cloned()
            .unwrap_or_default();
        for handler in targets {
            handler(&event);
        }
    }
    debug!(%connection_id, "hub: pump stopped");
}

// =============================================================================
// CONNECTION
// =============================================================================

/// One participant's connection to a [`SignalHub`].
pub struct HubConnection {
    connection_id: String,
    hub: SignalHub,
    handlers: Arc<Mutex<HashMap<String, Vec<SignalHandler>>>>,
    pump: JoinHandle<()>,
}

impl HubConnection {
    /// Leave the hub. Signals already queued are still delivered; later
    /// sends fail with [`SignalError::Closed`].
    pub fn disconnect(&self) {
        if self.hub.remove(&self.connection_id) {
            info!(connection_id = %self.connection_id, "hub: connection left");
        }
    }
}

impl Session for HubConnection {
    fn connection_id(&self) -> &str {
        &self.connection_id
    }

    fn on(&self, event: &str, handler: SignalHandler) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    fn send_signal(&self, signal: OutboundSignal) -> Result<(), SignalError> {
        self.hub.publish(&self.connection_id, signal)
    }
}

impl Drop for HubConnection {
    fn drop(&mut self) {
        self.disconnect();
        self.pump.abort();
    }
}

#[cfg(test)]
#[path = "hub_test.rs"]
mod tests;
