//! Host shell window state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ScreenLockType;

/// Root screen of the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootScreen {
    /// First-run / wallet login screen
    Initial,
    PinLogin,
    /// Wallet tabs
    Main,
}

impl RootScreen {
    /// Where a locked-out session lands: PIN login when a PIN exists
    pub fn relogin(screen_lock: ScreenLockType) -> Self {
        if screen_lock.has_pin() {
            RootScreen::PinLogin
        } else {
            RootScreen::Initial
        }
    }
}

/// Which windows the host shell should show
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellState {
    pub root: RootScreen,
    pub main_window_visible: bool,
    pub lock_window_visible: bool,
    pub unlock_count: u64,
    pub last_unlocked_at: Option<DateTime<Utc>>,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            root: RootScreen::Initial,
            main_window_visible: true,
            lock_window_visible: false,
            unlock_count: 0,
            last_unlocked_at: None,
        }
    }

    /// The lock window and the main window are never shown together
    pub fn set_lock_window(&mut self, shown: bool) {
        self.lock_window_visible = shown;
        self.main_window_visible = !shown;
    }

    /// Restore the main window after an unlock
    pub fn restore(&mut self, at: DateTime<Utc>, relogin: Option<RootScreen>) {
        self.set_lock_window(false);
        if let Some(root) = relogin {
            self.root = root;
        }
        self.unlock_count += 1;
        self.last_unlocked_at = Some(at);
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_exclusive() {
        let mut shell = ShellState::new();
        shell.set_lock_window(true);
        assert!(!shell.main_window_visible);
        shell.restore(Utc::now(), None);
        assert!(shell.main_window_visible);
        assert!(!shell.lock_window_visible);
        assert_eq!(shell.unlock_count, 1);
    }

    #[test]
    fn relogin_depends_on_pin() {
        assert_eq!(RootScreen::relogin(ScreenLockType::All), RootScreen::PinLogin);
        assert_eq!(RootScreen::relogin(ScreenLockType::FaceId), RootScreen::Initial);
    }
}
