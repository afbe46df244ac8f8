//! Chat configuration parsed from environment variables.

use crate::signal::{ErrorCode, SIGNAL_CHAT};

pub const DEFAULT_NOTIFICATION_SUFFIX: &str = " sent a message";
pub const DEFAULT_NOTIFICATION_CLASS: &str = "messageSnackbar";
pub const DEFAULT_NOTIFICATION_ACTION: &str = "READ";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "E_CONFIG_EMPTY",
        }
    }
}

/// Text used when raising a new-message notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    /// Appended to the uppercased sender nickname.
    pub suffix: String,
    pub css_class_name: String,
    pub button_action_text: String,
}

impl Default for NotificationText {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_NOTIFICATION_SUFFIX.into(),
            css_class_name: DEFAULT_NOTIFICATION_CLASS.into(),
            button_action_text: DEFAULT_NOTIFICATION_ACTION.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Signal type chat messages travel under.
    pub signal_type: String,
    pub notification: NotificationText,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { signal_type: SIGNAL_CHAT.into(), notification: NotificationText::default() }
    }
}

impl ChatConfig {
    /// Build chat config from environment variables.
    ///
    /// Optional:
    /// - `CHAT_SIGNAL_TYPE`: default `chat`
    /// - `CHAT_NOTIFICATION_SUFFIX`: default `" sent a message"`
    /// - `CHAT_NOTIFICATION_CLASS`: default `messageSnackbar`
    /// - `CHAT_NOTIFICATION_ACTION`: default `READ`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] if `CHAT_SIGNAL_TYPE` is set but blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let signal_type = env_or("CHAT_SIGNAL_TYPE", SIGNAL_CHAT);
        if signal_type.trim().is_empty() {
            return Err(ConfigError::Empty { var: "CHAT_SIGNAL_TYPE" });
        }

        let notification = NotificationText {
            suffix: env_or("CHAT_NOTIFICATION_SUFFIX", DEFAULT_NOTIFICATION_SUFFIX),
            css_class_name: env_or("CHAT_NOTIFICATION_CLASS", DEFAULT_NOTIFICATION_CLASS),
            button_action_text: env_or("CHAT_NOTIFICATION_ACTION", DEFAULT_NOTIFICATION_ACTION),
        };

        Ok(Self { signal_type, notification })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
