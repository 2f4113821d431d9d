//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    models::{
        AmountInput, Balance, BalanceTag, LimitInput, Settings, SettingsMenu, WalletMode,
    },
    state::{AppState, LifecycleEvent},
};
use super::responses::{
    ApiResponse, ConvertRequest, ConvertResponse, HealthResponse, LimitRequest, LimitResponse,
    LockResponse, StatusResponse,
};

/// Handle POST /lifecycle/:event - Forward a host lifecycle signal
pub async fn lifecycle_handler(
    State(state): State<Arc<AppState>>,
    Path(event): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let Some(event) = LifecycleEvent::from_path(&event) else {
        warn!("Unknown lifecycle event: {}", event);
        return Err(StatusCode::NOT_FOUND);
    };

    match state.lifecycle(event) {
        Ok(lock) => Ok(Json(ApiResponse::new(
            format!("Lifecycle {} applied", event.as_str()),
            lock,
        ))),
        Err(e) => {
            error!("Failed to apply lifecycle {}: {}", event.as_str(), e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /unlock - Clear the lock after re-authentication
pub async fn unlock_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let unlocked = state.unlock().map_err(|e| {
        error!("Failed to unlock: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let (lock, _) = state.get_lock_view().map_err(|e| {
        error!("Failed to read lock view: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if unlocked {
        info!("Unlock endpoint called - wallet unlocked");
        Ok(Json(ApiResponse::new("Wallet unlocked".to_string(), lock)))
    } else {
        info!("Unlock endpoint called while inactive - ignored");
        Ok(Json(ApiResponse::new("Unlock ignored: app is not active".to_string(), lock)))
    }
}

/// Handle GET /lock - Whether the lock screen must be shown
pub async fn lock_handler(State(state): State<Arc<AppState>>) -> Result<Json<LockResponse>, StatusCode> {
    match state.get_lock_view() {
        Ok((lock, show_lock_screen)) => Ok(Json(LockResponse { show_lock_screen, lock })),
        Err(e) => {
            error!("Failed to read lock view: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current lock and shell status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let (lock, show_lock_screen) = match state.get_lock_view() {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to read lock view: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let shell = match state.get_shell_state() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get shell state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        lock,
        show_lock_screen,
        shell,
        network: state.network,
        autolock_timeout_seconds: state.settings.timeout().as_secs(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle GET /settings - Stored wallet settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<Settings>, StatusCode> {
    state.settings.settings().map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Handle PUT /settings - Replace stored wallet settings
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, StatusCode> {
    match state.settings.save(settings.clone()) {
        Ok(()) => {
            info!("Settings updated (autolock {})", settings.autolock());
            Ok(Json(settings))
        }
        Err(e) => {
            error!("Failed to save settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /settings/menu - Assemble the settings menu for a wallet mode
pub async fn menu_handler(
    State(state): State<Arc<AppState>>,
    Json(mut mode): Json<WalletMode>,
) -> Json<SettingsMenu> {
    if mode.settings.is_none() {
        mode.settings = state.settings.settings();
    }
    Json(SettingsMenu::assemble(&mode))
}

/// Handle POST /convert - Convert an amount between units
pub async fn convert_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, StatusCode> {
    let input = AmountInput::from_details(&request.details).map_err(|e| {
        warn!("Rejected conversion input: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let balance = Balance::convert(&input, request.rate.as_ref()).map_err(|e| {
        warn!("Conversion failed: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let denomination = request
        .denomination
        .or_else(|| state.settings.settings().map(|s| s.denomination()))
        .unwrap_or_default();
    let display = balance.get(BalanceTag::Btc, denomination, state.network);
    let fiat_display = balance
        .fiat
        .is_some()
        .then(|| balance.get(BalanceTag::Fiat, denomination, state.network));

    Ok(Json(ConvertResponse {
        balance,
        display,
        fiat_display,
    }))
}

/// Handle POST /two-factor/limit - Validate a threshold and build the engine request
pub async fn limit_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LimitRequest>,
) -> Result<Json<LimitResponse>, StatusCode> {
    let denomination = request
        .denomination
        .or_else(|| state.settings.settings().map(|s| s.denomination()))
        .unwrap_or_default();
    let input = LimitInput::parse(&request.amount, request.is_fiat, denomination).map_err(|e| {
        warn!("Rejected two-factor limit: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let rate = request.rate.as_ref();
    let satoshi = input.satoshi(rate).map_err(|e| {
        warn!("Two-factor limit not convertible to satoshi: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let converted = rate
        .and_then(|rate| input.toggled(rate).ok())
        .map(|other| {
            let unit = if other.is_fiat {
                rate.map(|r| r.currency.clone()).unwrap_or_default()
            } else {
                denomination.label(state.network).to_string()
            };
            format!("≈ {} {}", other.amount, unit)
        });

    Ok(Json(LimitResponse {
        details: input.details(),
        satoshi,
        converted,
    }))
}
