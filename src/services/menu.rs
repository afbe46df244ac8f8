//! Side panel state — which menu, if any, is open.
//!
//! DESIGN
//! ======
//! At most one menu is open at a time. Toggling the open menu closes it;
//! toggling a different menu switches to it.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    Chat,
    Participants,
}

/// Panel visibility as seen by services that gate on it.
pub trait MenuControl: Send + Sync {
    fn is_menu_opened(&self) -> bool;

    fn toggle_menu(&self, menu: MenuType);
}

#[derive(Debug, Default)]
pub struct SidenavMenu {
    opened: RwLock<Option<MenuType>>,
}

impl SidenavMenu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The menu currently shown, if any.
    #[must_use]
    pub fn opened_menu(&self) -> Option<MenuType> {
        *self.opened.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn close(&self) {
        *self.opened.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl MenuControl for SidenavMenu {
    fn is_menu_opened(&self) -> bool {
        self.opened_menu().is_some()
    }

    fn toggle_menu(&self, menu: MenuType) {
        let mut opened = self.opened.write().unwrap_or_else(PoisonError::into_inner);
        *opened = if *opened == Some(menu) { None } else { Some(menu) };
        debug!(?menu, opened = ?*opened, "menu: toggled");
    }
}
