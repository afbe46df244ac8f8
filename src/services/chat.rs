//! Chat service — ordered message history over the session's signal bus.
//!
//! ARCHITECTURE
//! ============
//! Inbound `signal:chat` events are decoded, classified as local or remote,
//! appended to the history and published as a full snapshot. When the chat
//! panel is closed, each inbound message also raises a notification whose
//! action opens the panel.
//!
//! Outbound messages are sanitized and broadcast on the bus. They are NOT
//! appended locally: the sender's own message shows up only when the bus
//! echoes it back through the same inbound path.
//!
//! ERROR HANDLING
//! ==============
//! A malformed inbound event is logged and dropped. History stays intact
//! and the subscription keeps running. Inbound text is taken as-is; only
//! outbound text is sanitized.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ChatConfig;
use crate::services::menu::{MenuControl, MenuType};
use crate::services::notification::{NotificationOptions, Notifier};
use crate::services::participant::ParticipantDirectory;
use crate::session::Session;
use crate::signal::{ErrorCode, OutboundSignal, SignalError, SignalEvent, signal_event_name};
use crate::subject::{Observer, Subject};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("malformed chat payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("chat signal has no sender connection")]
    MissingSender,
    #[error("chat signal failed: {0}")]
    Signal(#[from] SignalError),
}

impl ErrorCode for ChatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => "E_MALFORMED_PAYLOAD",
            Self::MissingSender => "E_MISSING_SENDER",
            Self::Signal(e) => e.error_code(),
        }
    }
}

/// One chat utterance as shown in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Sent from this participant's own connection.
    pub is_local: bool,
    pub nickname: String,
    pub message: String,
}

/// Immutable snapshot of the full history, oldest first.
pub type MessageHistory = Arc<[ChatMessage]>;

/// Wire payload of a chat signal. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub message: String,
    pub nickname: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Unsubscribed,
    Subscribed,
}

// =============================================================================
// SANITIZE
// =============================================================================

/// Collapse every run of two or more spaces into a single space.
///
/// Only U+0020 is affected; tabs, newlines and leading/trailing spaces are
/// otherwise kept.
#[must_use]
pub fn sanitize_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut prev_space = false;
    for c in message.chars() {
        let is_space = c == ' ';
        if !(is_space && prev_space) {
            out.push(c);
        }
        prev_space = is_space;
    }
    out
}

/// Decode inbound signal data. Only a JSON object is a valid payload; serde
/// would otherwise accept a positional array for the struct.
fn decode_payload(data: &str) -> Result<ChatPayload, ChatError> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    if !value.is_object() {
        return Err(ChatError::MalformedPayload(serde::de::Error::custom(
            "chat payload must be a JSON object",
        )));
    }
    Ok(serde_json::from_value(value)?)
}

/// Sanitized text that must not be sent.
fn is_blank_message(message: &str) -> bool {
    message.is_empty() || message == " "
}

// =============================================================================
// SERVICE
// =============================================================================

/// Chat coordinator for one session.
pub struct ChatService {
    inner: Arc<ChatInner>,
}

struct ChatInner {
    session: Arc<dyn Session>,
    participants: Arc<dyn ParticipantDirectory>,
    menu: Arc<dyn MenuControl>,
    notifier: Arc<dyn Notifier>,
    config: ChatConfig,
    /// Append-only history. Held across append + publish.
    messages: Mutex<Vec<ChatMessage>>,
    messages_subject: Subject<MessageHistory>,
    subscribed: AtomicBool,
}

impl ChatService {
    #[must_use]
    pub fn new(
        session: Arc<dyn Session>,
        participants: Arc<dyn ParticipantDirectory>,
        menu: Arc<dyn MenuControl>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_config(session, participants, menu, notifier, ChatConfig::default())
    }

    #[must_use]
    pub fn with_config(
        session: Arc<dyn Session>,
        participants: Arc<dyn ParticipantDirectory>,
        menu: Arc<dyn MenuControl>,
        notifier: Arc<dyn Notifier>,
        config: ChatConfig,
    ) -> Self {
        let empty: MessageHistory = Arc::from(Vec::new());
        Self {
            inner: Arc::new(ChatInner {
                session,
                participants,
                menu,
                notifier,
                config,
                messages: Mutex::new(Vec::new()),
                messages_subject: Subject::new(empty),
                subscribed: AtomicBool::new(false),
            }),
        }
    }

    /// Start handling inbound chat signals for this session.
    ///
    /// Each call registers another handler; call once per session.
    pub fn subscribe_to_chat(&self) {
        let event = signal_event_name(&self.inner.config.signal_type);
        if self.inner.subscribed.swap(true, Ordering::SeqCst) {
            warn!(%event, "chat: already subscribed, registering duplicate handler");
        }

        // Weak: the session owns this handler and the service owns the session.
        let weak: Weak<ChatInner> = Arc::downgrade(&self.inner);
        self.inner.session.on(
            &event,
            Arc::new(move |signal: &SignalEvent| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Err(e) = inner.receive(signal) {
                    warn!(error = %e, error_code = e.error_code(), from = ?signal.sender_id(), "chat: dropped inbound signal");
                }
            }),
        );
        info!(%event, connection_id = %self.inner.session.connection_id(), "chat: subscribed");
    }

    /// Sanitize and broadcast a message. Blank messages are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Signal`] if the bus rejects the signal.
    pub fn send_message(&self, message: &str) -> Result<(), ChatError> {
        let message = sanitize_message(message);
        if is_blank_message(&message) {
            debug!("chat: ignoring blank message");
            return Ok(());
        }

        let payload = ChatPayload { message, nickname: self.inner.participants.local_nickname() };
        let signal = OutboundSignal::broadcast(self.inner.config.signal_type.as_str(), &payload)?;
        self.inner.session.send_signal(signal)?;
        debug!(nickname = %payload.nickname, "chat: message sent");
        Ok(())
    }

    /// Observe history snapshots, starting with the current one.
    #[must_use]
    pub fn messages(&self) -> Observer<MessageHistory> {
        self.inner.messages_subject.subscribe()
    }

    /// Current history snapshot.
    #[must_use]
    pub fn history(&self) -> MessageHistory {
        self.inner.messages_subject.value()
    }

    #[must_use]
    pub fn state(&self) -> ChatState {
        if self.is_subscribed() { ChatState::Subscribed } else { ChatState::Unsubscribed }
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.inner.subscribed.load(Ordering::SeqCst)
    }
}

impl ChatInner {
    /// Handle one inbound chat signal.
    fn receive(&self, signal: &SignalEvent) -> Result<(), ChatError> {
        let connection_id = signal.sender_id().ok_or(ChatError::MissingSender)?;
        let payload = decode_payload(&signal.data)?;
        let is_local = self.session.is_my_own_connection(connection_id);

        // Held until the snapshot is published. Notifiers must not call back
        // into this service synchronously.
        let mut messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        messages.push(ChatMessage { is_local, nickname: payload.nickname.clone(), message: payload.message });

        if !self.menu.is_menu_opened() {
            self.launch_notification(&payload.nickname);
        }

        let snapshot: MessageHistory = Arc::from(messages.as_slice());
        self.messages_subject.next(snapshot);
        debug!(%connection_id, is_local, count = messages.len(), "chat: message received");
        Ok(())
    }

    fn launch_notification(&self, nickname: &str) {
        let text = &self.config.notification;
        let options = NotificationOptions {
            message: format!("{}{}", nickname.to_uppercase(), text.suffix),
            css_class_name: text.css_class_name.clone(),
            button_action_text: text.button_action_text.clone(),
        };
        let menu = Arc::clone(&self.menu);
        self.notifier
            .launch_notification(options, Box::new(move || menu.toggle_menu(MenuType::Chat)));
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
