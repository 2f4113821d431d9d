use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wallet_shell::{
    create_router,
    models::{Network, ScreenLockType, Settings},
    services::{ManualClock, MemorySettingsStore},
    state::{AppState, Visibility},
};

fn app() -> (Router, Arc<ManualClock>) {
    let store = Arc::new(MemorySettingsStore::new(Some(Settings::default()), ScreenLockType::Pin));
    let clock = Arc::new(ManualClock::new());
    let state = Arc::new(AppState::new(0, "127.0.0.1".into(), Network::Mainnet, store, clock.clone()));
    state.start_observing(Visibility::Active).unwrap();
    (create_router(state), clock)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_lifecycle_event_is_not_found() {
    let (app, _) = app();
    let (status, _) = send(&app, Method::POST, "/lifecycle/did-explode", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn timeout_then_unlock() {
    let (app, clock) = app();
    send(&app, Method::POST, "/lifecycle/will-resign-active", None).await;
    send(&app, Method::POST, "/lifecycle/did-enter-background", None).await;
    clock.advance(Duration::from_secs(301));

    let (status, body) = send(&app, Method::POST, "/lifecycle/will-enter-foreground", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lock"]["lock_window"], "shown");

    send(&app, Method::POST, "/lifecycle/became-active", None).await;
    let (_, body) = send(&app, Method::GET, "/lock", None).await;
    assert_eq!(body["show_lock_screen"], true);
    assert_eq!(body["lock"]["lock_window"], "hidden");

    let (status, body) = send(&app, Method::POST, "/unlock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["show_lock_screen"], false);

    let (_, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(body["last_action"], "unlock");
    assert_eq!(body["autolock_timeout_seconds"], 300);
}

#[tokio::test]
async fn unlock_while_backgrounded_is_ignored() {
    let (app, _) = app();
    send(&app, Method::POST, "/lifecycle/did-enter-background", None).await;
    let (status, body) = send(&app, Method::POST, "/unlock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("ignored"));
}

#[tokio::test]
async fn convert_satoshi_with_rate() {
    let (app, _) = app();
    let request = json!({
        "satoshi": 100000,
        "rate": { "currency": "USD", "exchange": "bitfinex", "rate": "20000" }
    });
    let (status, body) = send(&app, Method::POST, "/convert", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"]["btc"], "0.00100000");
    assert_eq!(body["balance"]["fiat"], "20.00");
    assert_eq!(body["display"], json!(["0.00100000", "BTC"]));
    assert_eq!(body["fiat_display"], json!(["20.00", "USD"]));
}

#[tokio::test]
async fn convert_rejects_two_amounts() {
    let (app, _) = app();
    let request = json!({ "satoshi": 1, "btc": "1" });
    let (status, _) = send(&app, Method::POST, "/convert", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn two_factor_limit_details() {
    let (app, _) = app();
    let request = json!({ "amount": "1,5", "denomination": "mbtc" });
    let (status, body) = send(&app, Method::POST, "/two-factor/limit", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"], json!({ "is_fiat": false, "mbtc": "1.5" }));
    assert_eq!(body["satoshi"], 150000);
    assert!(body.get("converted").is_none());

    let request = json!({ "amount": "-1" });
    let (status, _) = send(&app, Method::POST, "/two-factor/limit", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn two_factor_limit_above_supply_range_is_rejected() {
    let (app, _) = app();
    let request = json!({ "amount": "1000000000000", "denomination": "btc" });
    let (status, body) = send(&app, Method::POST, "/two-factor/limit", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("details").is_none());

    let request = json!({ "amount": "10", "is_fiat": true });
    let (status, _) = send(&app, Method::POST, "/two-factor/limit", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settings_round_trip_and_menu() {
    let (app, _) = app();
    let mut settings = Settings::default();
    settings.altimeout = 60;
    settings.unit = "mBTC".into();
    let (status, _) = send(&app, Method::PUT, "/settings", Some(serde_json::to_value(&settings).unwrap())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/settings", None).await;
    assert_eq!(body["altimeout"], 60);

    let (status, body) = send(&app, Method::POST, "/settings/menu", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["sections"],
        json!(["network", "account", "two_factor", "security", "advanced", "about"])
    );

    // subtitles come from the stored settings when the request carries none
    let items = body["items"].as_array().unwrap();
    let subtitle = |kind: &str| {
        items
            .iter()
            .find(|item| item["type"] == kind)
            .map(|item| item["subtitle"].clone())
    };
    assert_eq!(subtitle("bitcoin_denomination"), Some(json!("mBTC")));
    assert_eq!(subtitle("autolock"), Some(json!("60 minutes")));
}
