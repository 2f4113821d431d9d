//! State management module
//! 
//! This module contains the screen lock state machine, the host shell
//! window state and the application state that owns both.

pub mod lock_state;
pub mod shell_state;
pub mod app_state;

// Re-export main types
pub use lock_state::{LifecycleEvent, LockState, LockWindow, Visibility};
pub use shell_state::{RootScreen, ShellState};
pub use app_state::AppState;
