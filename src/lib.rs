//! In-session chat coordination for a multi-party real-time room.
//!
//! DESIGN
//! ======
//! A [`ChatService`] is built per session with its collaborators injected:
//! the signaling [`Session`], a [`ParticipantDirectory`], a [`MenuControl`]
//! for panel visibility and a [`Notifier`]. It turns inbound chat signals
//! into an ordered, observable history and gates new-message notifications
//! on whether the panel is open.
//!
//! [`SignalHub`] is an in-memory bus implementing [`Session`] for local
//! rooms and tests.

pub mod config;
pub mod hub;
pub mod services;
pub mod session;
pub mod signal;
pub mod subject;

pub use config::ChatConfig;
pub use hub::{HubConnection, SignalHub};
pub use services::chat::{ChatError, ChatMessage, ChatService, ChatState, MessageHistory};
pub use services::menu::{MenuControl, MenuType, SidenavMenu};
pub use services::notification::{NotificationOptions, NotificationQueue, Notifier};
pub use services::participant::{LocalParticipant, ParticipantDirectory};
pub use session::Session;
pub use signal::{OutboundSignal, SignalError, SignalEvent};
pub use subject::{Observer, Subject};
