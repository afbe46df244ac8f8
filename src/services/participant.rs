//! Participant directory — resolves the local user's display name.

use std::sync::{PoisonError, RwLock};

pub trait ParticipantDirectory: Send + Sync {
    /// Display name of the local participant, as it should appear on
    /// outbound chat messages right now.
    fn local_nickname(&self) -> String;
}

/// The local participant with a mutable nickname.
#[derive(Debug, Default)]
pub struct LocalParticipant {
    nickname: RwLock<String>,
}

impl LocalParticipant {
    #[must_use]
    pub fn new(nickname: impl Into<String>) -> Self {
        Self { nickname: RwLock::new(nickname.into()) }
    }

    pub fn set_nickname(&self, nickname: impl Into<String>) {
        *self.nickname.write().unwrap_or_else(PoisonError::into_inner) = nickname.into();
    }
}

impl ParticipantDirectory for LocalParticipant {
    fn local_nickname(&self) -> String {
        self.nickname
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_participant_reports_nickname() {
        let p = LocalParticipant::new("Ann");
        assert_eq!(p.local_nickname(), "Ann");
    }

    #[test]
    fn set_nickname_is_visible_to_later_lookups() {
        let p = LocalParticipant::new("Ann");
        p.set_nickname("Annie");
        assert_eq!(p.local_nickname(), "Annie");
    }

    #[test]
    fn default_participant_has_empty_nickname() {
        assert_eq!(LocalParticipant::default().local_nickname(), "");
    }
}
