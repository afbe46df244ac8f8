//! Notifications — transient toasts with a single action button.
//!
//! DESIGN
//! ======
//! Services describe a notification with [`NotificationOptions`] and hand
//! over the action to run when the user presses the button. The
//! [`NotificationQueue`] keeps pending toasts until they are acted on or
//! dismissed; rendering is up to whoever drains it.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::info;

/// Deferred action bound to a notification's button.
pub type NotificationAction = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub message: String,
    /// Style classifier for the toast.
    pub css_class_name: String,
    pub button_action_text: String,
}

pub trait Notifier: Send + Sync {
    /// Raise a notification. `action` runs if the user presses its button.
    fn launch_notification(&self, options: NotificationOptions, action: NotificationAction);
}

// =============================================================================
// QUEUE
// =============================================================================

struct PendingNotification {
    options: NotificationOptions,
    action: NotificationAction,
}

impl fmt::Debug for PendingNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingNotification")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<VecDeque<PendingNotification>>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options of every pending notification, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<NotificationOptions> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|n| n.options.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Press the button on the newest notification. Returns its options, or
    /// `None` if nothing is pending.
    pub fn act_on_latest(&self) -> Option<NotificationOptions> {
        // Pop first, then run the action without holding the lock.
        let latest = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_back()?;
        (latest.action)();
        Some(latest.options)
    }

    /// Drop every pending notification without running its action.
    pub fn dismiss_all(&self) -> usize {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let count = pending.len();
        pending.clear();
        count
    }
}

impl Notifier for NotificationQueue {
    fn launch_notification(&self, options: NotificationOptions, action: NotificationAction) {
        info!(message = %options.message, class = %options.css_class_name, "notification: launched");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(PendingNotification { options, action });
    }
}

#[cfg(test)]
#[path = "notification_test.rs"]
mod tests;
