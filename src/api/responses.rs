//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    models::{Balance, DenominationType, ExchangeRate, Network},
    services::LockView,
    state::ShellState,
};

/// Response for lifecycle and unlock endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub show_lock_screen: bool,
    pub lock: LockView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(message: String, lock: LockView) -> Self {
        let status = if lock.locked { "locked" } else { "unlocked" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            show_lock_screen: lock.locked,
            lock,
        }
    }
}

/// Answer to `GET /lock`
#[derive(Debug, Clone, Serialize)]
pub struct LockResponse {
    pub show_lock_screen: bool,
    pub lock: LockView,
}

/// Enhanced status response with shell information
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub lock: LockView,
    pub show_lock_screen: bool,
    pub shell: ShellState,
    pub network: Network,
    pub autolock_timeout_seconds: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of `POST /convert`: one amount key plus an optional rate
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub rate: Option<ExchangeRate>,
    /// Display unit; defaults to the stored settings
    #[serde(default)]
    pub denomination: Option<DenominationType>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    pub balance: Balance,
    /// `(amount, unit)` in the display denomination
    pub display: (String, String),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiat_display: Option<(String, String)>,
}

/// Body of `POST /two-factor/limit`
#[derive(Debug, Clone, Deserialize)]
pub struct LimitRequest {
    pub amount: String,
    #[serde(default)]
    pub is_fiat: bool,
    #[serde(default)]
    pub denomination: Option<DenominationType>,
    #[serde(default)]
    pub rate: Option<ExchangeRate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LimitResponse {
    /// Request body for the engine's set-limit call
    pub details: Value,
    pub satoshi: u64,
    /// The same amount on the other side of the fiat toggle, e.g. `"≈ 10.00 USD"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted: Option<String>,
}
