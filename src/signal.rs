//! Signal — the envelope type carried by the session's signaling bus.
//!
//! ARCHITECTURE
//! ============
//! Every signal on the bus is a named, broadcast message. Senders build an
//! [`OutboundSignal`] (type + optional targets + opaque string payload); the
//! bus stamps the sender's connection and delivers a [`SignalEvent`] to every
//! handler registered under `signal:<type>`.
//!
//! DESIGN
//! ======
//! - The payload is an opaque string. The bus never inspects it; consumers
//!   decode it with their own schema.
//! - An empty target list means broadcast to every connection in the session,
//!   the sender included.

use serde::{Deserialize, Serialize};

// =============================================================================
// SIGNAL CONSTANTS
// =============================================================================

/// Signal type used for chat messages.
pub const SIGNAL_CHAT: &str = "chat";

/// Prefix shared by every signal event name on the bus.
pub const SIGNAL_EVENT_PREFIX: &str = "signal";

/// Event name handlers subscribe to for a given signal type, e.g. `"signal:chat"`.
#[must_use]
pub fn signal_event_name(signal_type: &str) -> String {
    format!("{SIGNAL_EVENT_PREFIX}:{signal_type}")
}

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for structured log fields.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// The payload could not be serialized into the signal's data string.
    #[error("failed to encode signal payload: {0}")]
    Encode(#[from] serde_json::Error),
    /// The sending connection is no longer attached to the bus.
    #[error("connection {0} is closed")]
    Closed(String),
}

impl ErrorCode for SignalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "E_SIGNAL_ENCODE",
            Self::Closed(_) => "E_SIGNAL_CLOSED",
        }
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// A participant's live connection within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: String,
}

impl Connection {
    #[must_use]
    pub fn new(connection_id: impl Into<String>) -> Self {
        Self { connection_id: connection_id.into() }
    }
}

/// A signal as delivered to handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEvent {
    #[serde(rename = "type")]
    pub signal_type: String,
    /// Sending connection. `None` for signals originated by the bus itself.
    #[serde(default)]
    pub from: Option<Connection>,
    /// Opaque payload, usually JSON text.
    #[serde(default)]
    pub data: String,
}

impl SignalEvent {
    /// Event name this signal is dispatched under.
    #[must_use]
    pub fn event_name(&self) -> String {
        signal_event_name(&self.signal_type)
    }

    /// Sender connection id, if the envelope carries one.
    #[must_use]
    pub fn sender_id(&self) -> Option<&str> {
        self.from.as_ref().map(|c| c.connection_id.as_str())
    }
}

/// A signal about to be published on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundSignal {
    pub signal_type: String,
    /// Target connection ids. Empty means broadcast.
    pub to: Vec<String>,
    pub data: String,
}

impl OutboundSignal {
    /// Build a broadcast signal whose data is `payload` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Encode`] if the payload cannot be serialized.
    pub fn broadcast(signal_type: impl Into<String>, payload: &impl Serialize) -> Result<Self, SignalError> {
        Ok(Self { signal_type: signal_type.into(), to: Vec::new(), data: serde_json::to_string(payload)? })
    }

    #[must_use]
    pub fn with_to(mut self, to: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.to = to.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.to.is_empty()
    }

    /// Whether a connection is a recipient of this signal.
    #[must_use]
    pub fn is_addressed_to(&self, connection_id: &str) -> bool {
        self.is_broadcast() || self.to.iter().any(|id| id == connection_id)
    }

    /// Stamp the sender and turn this into the event handlers receive.
    #[must_use]
    pub fn into_event(self, from: &str) -> SignalEvent {
        SignalEvent { signal_type: self.signal_type, from: Some(Connection::new(from)), data: self.data }
    }
}

#[cfg(test)]
#[path = "signal_test.rs"]
mod tests;
