//! Screen locker: lifecycle observer around [`LockState`]

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::state::lock_state::{LifecycleEvent, LockState, LockWindow, Visibility};

use super::{clock::Clock, settings_store::SettingsStore};

/// Snapshot published after every transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockView {
    pub visibility: Visibility,
    pub locked: bool,
    pub lock_window: LockWindow,
    /// Seconds since the app left the active state
    pub countdown_secs: Option<u64>,
    pub observing: bool,
}

/// Fired once per successful `unlock()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlockEvent {
    pub at: DateTime<Utc>,
    /// Whether the timeout had actually locked the wallet
    pub was_locked: bool,
}

pub struct ScreenLocker {
    state: LockState,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    observing: bool,
    lock_window: LockWindow,
    unlock_tx: Option<mpsc::UnboundedSender<UnlockEvent>>,
    view_tx: watch::Sender<LockView>,
}

impl ScreenLocker {
    pub fn new(settings: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        let state = LockState::new();
        let lock_window = state.reconcile();
        let (view_tx, _) = watch::channel(LockView {
            visibility: state.visibility(),
            locked: state.is_locked(),
            lock_window,
            countdown_secs: None,
            observing: false,
        });
        Self {
            state,
            settings,
            clock,
            observing: false,
            lock_window,
            unlock_tx: None,
            view_tx,
        }
    }

    /// Begin observing lifecycle signals from a fresh, unlocked state
    pub fn start(&mut self, initial: Visibility) -> LockView {
        self.clear();
        self.observing = true;
        self.state.set_initial_visibility(initial, self.clock.now());
        info!("Screen locker observing, initial visibility {:?}", initial);
        self.ensure_ui()
    }

    /// Stop observing. The lock state stays as it was.
    pub fn stop(&mut self) -> LockView {
        self.observing = false;
        self.lock_window = LockWindow::Hidden;
        info!("Screen locker stopped (locked={})", self.state.is_locked());
        self.publish()
    }

    /// Reset lock and countdown and hide the lock window
    pub fn clear(&mut self) {
        self.state.clear();
        self.lock_window = LockWindow::Hidden;
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Apply a lifecycle signal; ignored while stopped
    pub fn handle(&mut self, event: LifecycleEvent) -> LockView {
        if !self.observing {
            debug!("Ignoring {} while not observing", event.as_str());
            return self.view();
        }
        let was_locked = self.state.is_locked();
        let settings = Arc::clone(&self.settings);
        self.state.apply(event, self.clock.now(), || settings.timeout());

        if self.state.is_locked() && !was_locked {
            info!("Autolock timeout elapsed, wallet locked");
        }
        debug!("Lifecycle {} -> {:?}", event.as_str(), self.state.visibility());
        self.ensure_ui()
    }

    pub fn became_active(&mut self) -> LockView {
        self.handle(LifecycleEvent::BecameActive)
    }

    pub fn will_resign_active(&mut self) -> LockView {
        self.handle(LifecycleEvent::WillResignActive)
    }

    pub fn will_enter_foreground(&mut self) -> LockView {
        self.handle(LifecycleEvent::WillEnterForeground)
    }

    pub fn did_enter_background(&mut self) -> LockView {
        self.handle(LifecycleEvent::DidEnterBackground)
    }

    /// Clear the lock after successful re-authentication.
    ///
    /// No-op unless the app is active. Returns whether it unlocked.
    pub fn unlock(&mut self) -> bool {
        let was_locked = self.state.is_locked();
        if !self.state.unlock() {
            debug!("Unlock ignored while {:?}", self.state.visibility());
            return false;
        }
        self.lock_window = LockWindow::Hidden;
        self.publish();

        let event = UnlockEvent {
            at: Utc::now(),
            was_locked,
        };
        match &self.unlock_tx {
            Some(tx) => {
                if tx.send(event).is_err() {
                    warn!("Unlock observer has gone away");
                    self.unlock_tx = None;
                }
            }
            None => debug!("Unlocked with no observer registered"),
        }
        info!("Wallet unlocked");
        true
    }

    pub fn should_show_lock_screen(&self) -> bool {
        self.state.should_show_lock_screen()
    }

    pub fn lock_state(&self) -> &LockState {
        &self.state
    }

    pub fn view(&self) -> LockView {
        LockView {
            visibility: self.state.visibility(),
            locked: self.state.is_locked(),
            lock_window: self.lock_window,
            countdown_secs: self.state.elapsed(self.clock.now()).map(|d| d.as_secs()),
            observing: self.observing,
        }
    }

    /// Register the single unlock observer, replacing any previous one
    pub fn subscribe_unlocked(&mut self) -> mpsc::UnboundedReceiver<UnlockEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.unlock_tx.replace(tx).is_some() {
            debug!("Replacing previous unlock observer");
        }
        rx
    }

    /// Watch lock view updates
    pub fn watch(&self) -> watch::Receiver<LockView> {
        self.view_tx.subscribe()
    }

    fn ensure_ui(&mut self) -> LockView {
        let window = self.state.reconcile();
        if window != self.lock_window {
            debug!("Lock window {:?} -> {:?}", self.lock_window, window);
        }
        self.lock_window = window;
        self.publish()
    }

    fn publish(&self) -> LockView {
        let view = self.view();
        self.view_tx.send_replace(view.clone());
        view
    }
}

impl fmt::Debug for ScreenLocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenLocker")
            .field("state", &self.state)
            .field("observing", &self.observing)
            .field("lock_window", &self.lock_window)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Settings,
        services::{clock::ManualClock, settings_store::MemorySettingsStore},
    };
    use std::time::Duration;

    fn locker(minutes: Option<u32>) -> (ScreenLocker, Arc<ManualClock>, Arc<MemorySettingsStore>) {
        let settings = minutes.map(|m| Settings {
            altimeout: m,
            ..Settings::default()
        });
        let store = Arc::new(MemorySettingsStore::new(settings, Default::default()));
        let clock = Arc::new(ManualClock::new());
        let mut locker = ScreenLocker::new(store.clone(), clock.clone());
        locker.start(Visibility::Active);
        (locker, clock, store)
    }

    #[test]
    fn ignores_events_until_started() {
        let store = Arc::new(MemorySettingsStore::default());
        let clock = Arc::new(ManualClock::new());
        let mut locker = ScreenLocker::new(store, clock);
        let view = locker.did_enter_background();
        assert_eq!(view.visibility, Visibility::Active);
        assert!(!view.observing);
    }

    #[test]
    fn start_inactive_begins_countdown() {
        let store = Arc::new(MemorySettingsStore::default());
        let clock = Arc::new(ManualClock::new());
        let mut locker = ScreenLocker::new(store, clock.clone());
        locker.start(Visibility::Background);
        clock.advance(Duration::from_secs(301));
        let view = locker.became_active();
        assert!(view.locked);
    }

    #[tokio::test]
    async fn unlock_notifies_single_observer() {
        let (mut locker, clock, _) = locker(Some(1));
        let mut first = locker.subscribe_unlocked();
        let mut second = locker.subscribe_unlocked();
        // the replaced observer's channel is closed
        assert!(first.recv().await.is_none());

        locker.did_enter_background();
        clock.advance(Duration::from_secs(61));
        locker.will_enter_foreground();
        assert!(!locker.unlock());
        assert!(second.try_recv().is_err());

        locker.became_active();
        assert!(locker.should_show_lock_screen());
        assert!(locker.unlock());
        let event = second.recv().await.unwrap();
        assert!(event.was_locked);
        assert!(!locker.should_show_lock_screen());
    }

    #[test]
    fn settings_change_applies_mid_countdown() {
        let (mut locker, clock, store) = locker(Some(10));
        locker.will_resign_active();
        clock.advance(Duration::from_secs(120));
        store
            .save(Settings {
                altimeout: 1,
                ..Settings::default()
            })
            .unwrap();
        assert!(locker.became_active().locked);
    }

    #[test]
    fn watch_sees_transitions() {
        let (mut locker, clock, _) = locker(None);
        let rx = locker.watch();
        locker.did_enter_background();
        assert_eq!(rx.borrow().visibility, Visibility::Background);
        clock.advance(Duration::from_secs(400));
        locker.will_enter_foreground();
        assert_eq!(rx.borrow().lock_window, LockWindow::Shown);
        assert_eq!(rx.borrow().countdown_secs, Some(400));
        locker.became_active();
        assert_eq!(rx.borrow().lock_window, LockWindow::Hidden);
        assert!(rx.borrow().locked);
    }

    #[test]
    fn stop_preserves_lock() {
        let (mut locker, clock, _) = locker(Some(1));
        locker.did_enter_background();
        clock.advance(Duration::from_secs(90));
        locker.became_active();
        let view = locker.stop();
        assert!(view.locked);
        assert!(!view.observing);
        assert_eq!(view.lock_window, LockWindow::Hidden);
        // lifecycle signals are no longer observed
        locker.did_enter_background();
        assert_eq!(locker.view().visibility, Visibility::Active);
    }
}
