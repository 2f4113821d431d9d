//! Wallet Shell - screen lock and settings logic for a Bitcoin/Liquid wallet
//! 
//! This library tracks app visibility to decide when the wallet must be
//! re-authenticated, converts amounts between denominations and fiat, and
//! assembles the settings menu for the current wallet mode.

pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
