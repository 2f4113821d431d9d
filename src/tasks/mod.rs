//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod unlock_listener;

// Re-export main functions
pub use unlock_listener::unlock_listener_task;
