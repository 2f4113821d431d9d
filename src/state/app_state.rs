//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::{
    models::Network,
    services::{Clock, LockView, ScreenLocker, SettingsStore, UnlockEvent},
};
use super::{LifecycleEvent, RootScreen, ShellState, Visibility};

/// Main application state: the screen locker, shell windows and metadata
#[derive(Debug)]
pub struct AppState {
    /// Single-writer screen locker; the mutex serializes lifecycle transitions
    pub locker: Arc<Mutex<ScreenLocker>>,
    /// Host shell windows
    pub shell: Arc<Mutex<ShellState>>,
    pub settings: Arc<dyn SettingsStore>,
    pub network: Network,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState; the locker is built but not yet observing
    pub fn new(
        port: u16,
        host: String,
        network: Network,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let locker = ScreenLocker::new(Arc::clone(&settings), clock);
        Self {
            locker: Arc::new(Mutex::new(locker)),
            shell: Arc::new(Mutex::new(ShellState::new())),
            settings,
            network,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run a closure against the locker under its lock
    fn with_locker<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut ScreenLocker) -> T,
    {
        let mut locker = self.locker.lock()
            .map_err(|e| format!("Failed to lock screen locker: {}", e))?;
        Ok(f(&mut *locker))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start observing lifecycle signals
    pub fn start_observing(&self, initial: Visibility) -> Result<LockView, String> {
        let view = self.with_locker(|locker| locker.start(initial))?;
        self.record_action("start");
        Ok(view)
    }

    /// Stop observing lifecycle signals; lock state is kept
    pub fn stop_observing(&self) -> Result<LockView, String> {
        let view = self.with_locker(|locker| locker.stop())?;
        self.set_lock_window(false)?;
        self.record_action("stop");
        Ok(view)
    }

    /// Apply a lifecycle signal from the host shell
    pub fn lifecycle(&self, event: LifecycleEvent) -> Result<LockView, String> {
        let view = self.with_locker(|locker| locker.handle(event))?;
        self.record_action(event.as_str());
        debug!("Lifecycle {} handled: {:?}", event.as_str(), view);
        Ok(view)
    }

    /// Manual unlock after PIN or biometric entry
    pub fn unlock(&self) -> Result<bool, String> {
        let unlocked = self.with_locker(|locker| locker.unlock())?;
        if unlocked {
            self.record_action("unlock");
        }
        Ok(unlocked)
    }

    /// Current lock view and whether the re-authentication screen is needed
    pub fn get_lock_view(&self) -> Result<(LockView, bool), String> {
        self.with_locker(|locker| (locker.view(), locker.should_show_lock_screen()))
    }

    pub fn subscribe_unlocked(&self) -> Result<mpsc::UnboundedReceiver<UnlockEvent>, String> {
        self.with_locker(|locker| locker.subscribe_unlocked())
    }

    pub fn watch_lock_view(&self) -> Result<watch::Receiver<LockView>, String> {
        self.with_locker(|locker| locker.watch())
    }

    /// Get current shell state
    pub fn get_shell_state(&self) -> Result<ShellState, String> {
        self.shell.lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock shell state: {}", e))
    }

    /// Show or hide the lock window in the shell
    pub fn set_lock_window(&self, shown: bool) -> Result<(), String> {
        let mut shell = self.shell.lock()
            .map_err(|e| format!("Failed to lock shell state: {}", e))?;
        if shell.lock_window_visible != shown {
            info!("Lock window {}", if shown { "shown" } else { "hidden" });
        }
        shell.set_lock_window(shown);
        Ok(())
    }

    /// Restore the main window after an unlock event
    pub fn apply_unlock(&self, event: &UnlockEvent) -> Result<ShellState, String> {
        let relogin = if event.was_locked {
            Some(RootScreen::relogin(self.settings.screen_lock()))
        } else {
            None
        };
        let mut shell = self.shell.lock()
            .map_err(|e| format!("Failed to lock shell state: {}", e))?;
        shell.restore(event.at, relogin);
        info!("Main window restored, root {:?}", shell.root);
        Ok(shell.clone())
    }

    /// Route the shell to a root screen
    pub fn set_root(&self, root: RootScreen) -> Result<(), String> {
        let mut shell = self.shell.lock()
            .map_err(|e| format!("Failed to lock shell state: {}", e))?;
        shell.root = root;
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
