//! Screen lock state machine
//!
//! Tracks foreground/background transitions and decides whether the wallet
//! must be re-authenticated. The state is single-writer: every transition
//! runs to completion before the next one starts, so it is held behind one
//! lock by its owner and never mutated concurrently.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Application visibility as reported by the host's lifecycle signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Active,
    /// Temporarily inactive while on screen, or returning from background
    InactiveForeground,
    Background,
}

impl Visibility {
    pub fn is_active(&self) -> bool {
        matches!(self, Visibility::Active)
    }
}

/// Lifecycle signals delivered by the host shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEvent {
    BecameActive,
    WillResignActive,
    WillEnterForeground,
    DidEnterBackground,
}

impl LifecycleEvent {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "became-active" => Some(LifecycleEvent::BecameActive),
            "will-resign-active" => Some(LifecycleEvent::WillResignActive),
            "will-enter-foreground" => Some(LifecycleEvent::WillEnterForeground),
            "did-enter-background" => Some(LifecycleEvent::DidEnterBackground),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::BecameActive => "became-active",
            LifecycleEvent::WillResignActive => "will-resign-active",
            LifecycleEvent::WillEnterForeground => "will-enter-foreground",
            LifecycleEvent::DidEnterBackground => "did-enter-background",
        }
    }
}

/// Whether the lock window covers the wallet UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockWindow {
    Shown,
    Hidden,
}

impl LockWindow {
    pub fn is_shown(&self) -> bool {
        matches!(self, LockWindow::Shown)
    }
}

/// Lock state owned by the screen locker
#[derive(Debug, Clone)]
pub struct LockState {
    visibility: Visibility,
    countdown_start: Option<Instant>,
    locked: bool,
}

impl LockState {
    /// Active, unlocked, no countdown
    pub fn new() -> Self {
        Self {
            visibility: Visibility::Active,
            countdown_start: None,
            locked: false,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn countdown_start(&self) -> Option<Instant> {
        self.countdown_start
    }

    /// Time spent inactive so far, if a countdown is running
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.countdown_start.map(|start| now.saturating_duration_since(start))
    }

    /// Reset lock and countdown; visibility is left alone
    pub fn clear(&mut self) {
        self.countdown_start = None;
        self.locked = false;
    }

    /// Apply one lifecycle signal. `timeout` is consulted only when a
    /// countdown needs evaluating, so settings are read at most once and
    /// always fresh.
    pub fn apply<F>(&mut self, event: LifecycleEvent, now: Instant, timeout: F) -> LockWindow
    where
        F: FnOnce() -> Duration,
    {
        match event {
            LifecycleEvent::BecameActive => self.became_active(now, timeout),
            LifecycleEvent::WillResignActive => self.will_resign_active(now),
            LifecycleEvent::WillEnterForeground => self.will_enter_foreground(now, timeout),
            LifecycleEvent::DidEnterBackground => self.did_enter_background(now),
        }
        self.reconcile()
    }

    pub fn became_active<F>(&mut self, now: Instant, timeout: F)
    where
        F: FnOnce() -> Duration,
    {
        if self.visibility.is_active() {
            return;
        }
        self.lock_if_expired(now, timeout);
        self.countdown_start = None;
        self.visibility = Visibility::Active;
    }

    pub fn will_resign_active(&mut self, now: Instant) {
        // a resign while backgrounded keeps the stronger state
        if self.visibility != Visibility::Background {
            self.visibility = Visibility::InactiveForeground;
        }
        self.start_countdown(now);
    }

    pub fn did_enter_background(&mut self, now: Instant) {
        self.visibility = Visibility::Background;
        self.start_countdown(now);
    }

    /// Returning from background. May lock, never unlocks, keeps the countdown.
    pub fn will_enter_foreground<F>(&mut self, now: Instant, timeout: F)
    where
        F: FnOnce() -> Duration,
    {
        if self.visibility == Visibility::Background {
            self.visibility = Visibility::InactiveForeground;
        }
        if !self.visibility.is_active() {
            self.lock_if_expired(now, timeout);
        }
    }

    /// Clear the lock. Returns `false` (and changes nothing) unless active.
    pub fn unlock(&mut self) -> bool {
        if !self.visibility.is_active() {
            return false;
        }
        self.clear();
        true
    }

    /// Lock window decision for the current state
    pub fn reconcile(&self) -> LockWindow {
        if self.visibility.is_active() {
            LockWindow::Hidden
        } else if self.locked {
            LockWindow::Shown
        } else {
            // grace period before the timeout elapses
            LockWindow::Hidden
        }
    }

    /// Whether the host must show the re-authentication screen
    pub fn should_show_lock_screen(&self) -> bool {
        self.locked
    }

    /// Set the visibility the process started with
    pub fn set_initial_visibility(&mut self, visibility: Visibility, now: Instant) {
        self.visibility = visibility;
        if !visibility.is_active() {
            self.start_countdown(now);
        }
    }

    fn start_countdown(&mut self, now: Instant) {
        if self.countdown_start.is_none() {
            self.countdown_start = Some(now);
        }
    }

    fn lock_if_expired<F>(&mut self, now: Instant, timeout: F)
    where
        F: FnOnce() -> Duration,
    {
        if self.locked {
            return;
        }
        let Some(elapsed) = self.elapsed(now) else {
            return;
        };
        // whole seconds, matching the granularity of the setting
        if elapsed.as_secs() >= timeout().as_secs() {
            self.locked = true;
        }
    }
}

impl Default for LockState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    fn at(base: Instant, secs: u64) -> Instant {
        base + Duration::from_secs(secs)
    }

    #[test]
    fn starts_active_and_unlocked() {
        let state = LockState::new();
        assert_eq!(state.visibility(), Visibility::Active);
        assert!(!state.is_locked());
        assert!(state.countdown_start().is_none());
        assert_eq!(state.reconcile(), LockWindow::Hidden);
    }

    #[test]
    fn short_absence_does_not_lock() {
        let t0 = Instant::now();
        let mut state = LockState::new();
        state.will_resign_active(t0);
        state.became_active(at(t0, 299), || FIVE_MINUTES);
        assert!(!state.is_locked());
        assert!(state.countdown_start().is_none());
    }

    #[test]
    fn long_absence_locks() {
        let t0 = Instant::now();
        let mut state = LockState::new();
        state.did_enter_background(t0);
        state.became_active(at(t0, 300), || FIVE_MINUTES);
        assert!(state.is_locked());
        assert!(state.should_show_lock_screen());
        assert_eq!(state.reconcile(), LockWindow::Hidden);
    }

    #[test]
    fn repeated_resign_keeps_first_countdown() {
        let t0 = Instant::now();
        let mut state = LockState::new();
        state.will_resign_active(t0);
        state.will_resign_active(at(t0, 100));
        state.did_enter_background(at(t0, 200));
        assert_eq!(state.countdown_start(), Some(t0));
    }

    #[test]
    fn unlock_requires_active() {
        let t0 = Instant::now();
        let mut state = LockState::new();
        state.did_enter_background(t0);
        state.will_enter_foreground(at(t0, 400), || FIVE_MINUTES);
        assert!(state.is_locked());
        assert!(!state.unlock());
        assert!(state.is_locked());
        assert_eq!(state.countdown_start(), Some(t0));
        assert_eq!(state.reconcile(), LockWindow::Shown);
    }

    #[test]
    fn foreground_never_clears_lock() {
        let t0 = Instant::now();
        let mut state = LockState::new();
        state.did_enter_background(t0);
        state.will_enter_foreground(at(t0, 10), || FIVE_MINUTES);
        assert_eq!(state.visibility(), Visibility::InactiveForeground);
        assert!(!state.is_locked());
        state.became_active(at(t0, 20), || FIVE_MINUTES);
        assert!(!state.is_locked());

        state.did_enter_background(at(t0, 30));
        state.became_active(at(t0, 1000), || FIVE_MINUTES);
        assert!(state.is_locked());
        state.did_enter_background(at(t0, 1001));
        state.will_enter_foreground(at(t0, 1002), || FIVE_MINUTES);
        assert!(state.is_locked());
    }

    #[test]
    fn inactive_grace_period_hides_lock_window() {
        let t0 = Instant::now();
        let mut state = LockState::new();
        let window = state.apply(LifecycleEvent::WillResignActive, t0, || FIVE_MINUTES);
        assert_eq!(window, LockWindow::Hidden);
    }

    #[test]
    fn timeout_not_read_without_countdown() {
        let t0 = Instant::now();
        let mut state = LockState::new();
        state.became_active(t0, || panic!("settings read while already active"));
        state.set_initial_visibility(Visibility::InactiveForeground, t0);
        state.clear();
        state.became_active(t0, || panic!("settings read without a countdown"));
        assert!(state.visibility().is_active());
    }

    #[test]
    fn zero_timeout_locks_immediately() {
        let t0 = Instant::now();
        let mut state = LockState::new();
        state.will_resign_active(t0);
        state.became_active(t0, || Duration::ZERO);
        assert!(state.is_locked());
        assert!(state.unlock());
        assert!(!state.is_locked());
    }

    #[test]
    fn lifecycle_paths() {
        for event in [
            LifecycleEvent::BecameActive,
            LifecycleEvent::WillResignActive,
            LifecycleEvent::WillEnterForeground,
            LifecycleEvent::DidEnterBackground,
        ] {
            assert_eq!(LifecycleEvent::from_path(event.as_str()), Some(event));
        }
        assert_eq!(LifecycleEvent::from_path("terminate"), None);
    }
}
