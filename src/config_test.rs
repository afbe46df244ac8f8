use super::*;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that touch process env.
fn env_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Caller must hold [`env_guard`].
unsafe fn clear_chat_env() {
    unsafe {
        std::env::remove_var("CHAT_SIGNAL_TYPE");
        std::env::remove_var("CHAT_NOTIFICATION_SUFFIX");
        std::env::remove_var("CHAT_NOTIFICATION_CLASS");
        std::env::remove_var("CHAT_NOTIFICATION_ACTION");
    }
}

#[test]
fn default_matches_fixed_chat_values() {
    let cfg = ChatConfig::default();
    assert_eq!(cfg.signal_type, "chat");
    assert_eq!(cfg.notification.suffix, " sent a message");
    assert_eq!(cfg.notification.css_class_name, "messageSnackbar");
    assert_eq!(cfg.notification.button_action_text, "READ");
}

#[test]
fn from_env_without_overrides_equals_default() {
    let _guard = env_guard();
    unsafe { clear_chat_env() };

    let cfg = ChatConfig::from_env().unwrap();
    assert_eq!(cfg, ChatConfig::default());
}

#[test]
fn from_env_applies_overrides() {
    let _guard = env_guard();
    unsafe {
        clear_chat_env();
        std::env::set_var("CHAT_SIGNAL_TYPE", "room-chat");
        std::env::set_var("CHAT_NOTIFICATION_SUFFIX", " wrote");
        std::env::set_var("CHAT_NOTIFICATION_CLASS", "toast");
        std::env::set_var("CHAT_NOTIFICATION_ACTION", "OPEN");
    }

    let cfg = ChatConfig::from_env().unwrap();
    assert_eq!(cfg.signal_type, "room-chat");
    assert_eq!(
        cfg.notification,
        NotificationText { suffix: " wrote".into(), css_class_name: "toast".into(), button_action_text: "OPEN".into() }
    );

    unsafe { clear_chat_env() };
}

#[test]
fn from_env_rejects_blank_signal_type() {
    let _guard = env_guard();
    unsafe {
        clear_chat_env();
        std::env::set_var("CHAT_SIGNAL_TYPE", "  ");
    }

    let err = ChatConfig::from_env().unwrap_err();
    assert_eq!(err.error_code(), "E_CONFIG_EMPTY");
    assert!(err.to_string().contains("CHAT_SIGNAL_TYPE"));

    unsafe { clear_chat_env() };
}
