//! Collaborators around the lock state machine
//! 
//! The settings store, the clock and the screen locker that ties them to
//! the lifecycle signals coming from the host shell.

pub mod clock;
pub mod screen_locker;
pub mod settings_store;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use screen_locker::{LockView, ScreenLocker, UnlockEvent};
pub use settings_store::{
    FileSettingsStore, MemorySettingsStore, SettingsStore, StoredPreferences, DEFAULT_TIMEOUT,
};
