//! Integration tests for `/lamp/flash`.
//!
//! Time is paused so the background sequence can be sampled at exact points
//! without real sleeps.

#![cfg(feature = "web")]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use pi_lamp::hal::MockPin;
use pi_lamp::services::{build_router, ErrorResponse, FlashResponse, LampStatus, SharedLampState, WebServerConfig};
use pi_lamp::{FlashConfig, LampController, PinLevel};

fn create_test_app(flash: FlashConfig) -> (axum::Router, Arc<SharedLampState<MockPin>>) {
    let state = Arc::new(SharedLampState::new(LampController::new(MockPin::new()), flash));
    let router = build_router(Arc::clone(&state), &WebServerConfig::default());
    (router, state)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn flash_returns_before_sequence_runs() {
    let (app, state) = create_test_app(FlashConfig::default());

    let (status, body) = get(&app, "/lamp/flash?duration=4&flashes=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"flashing","duration":4,"flashes":2}"#);
    // Sequence has been scheduled but not yet finished
    assert!(state.with_lamp(|lamp| lamp.pin().history.len()) < 4);
}

#[tokio::test(start_paused = true)]
async fn flash_toggles_with_one_second_phases() {
    let (app, state) = create_test_app(FlashConfig::default());
    get(&app, "/lamp/flash?duration=4&flashes=2").await;

    // Sample the middle of each one-second phase
    let expected = [
        PinLevel::High,
        PinLevel::Low,
        PinLevel::High,
        PinLevel::Low,
    ];
    advance_ms(500).await;
    for level in expected {
        assert_eq!(state.with_lamp(|lamp| lamp.pin().level), level);
        advance_ms(1000).await;
    }

    // Sequence complete at t=4.5s
    state.with_lamp(|lamp| {
        assert_eq!(lamp.pin().history, expected.to_vec());
        assert_eq!(lamp.pin().rising_edges(), 2);
    });
    assert_eq!(state.active_flashes(), 0);
}

#[tokio::test(start_paused = true)]
async fn flash_defaults_to_five_over_five_seconds() {
    let (app, state) = create_test_app(FlashConfig::default());

    let (status, body) = get(&app, "/lamp/flash").await;
    assert_eq!(status, StatusCode::OK);
    let json: FlashResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(json.status, LampStatus::Flashing);
    assert_eq!(json.duration, 5);
    assert_eq!(json.flashes, 5);

    advance_ms(5_100).await;
    state.with_lamp(|lamp| {
        assert_eq!(lamp.pin().history.len(), 10);
        assert_eq!(lamp.pin().level, PinLevel::Low);
    });
}

#[tokio::test(start_paused = true)]
async fn flash_defaults_follow_config() {
    let config = FlashConfig::default()
        .with_default_duration_secs(2)
        .with_default_flashes(1);
    let (app, _state) = create_test_app(config);

    let (_, body) = get(&app, "/lamp/flash").await;
    assert_eq!(body, r#"{"status":"flashing","duration":2,"flashes":1}"#);
}

#[tokio::test(start_paused = true)]
async fn flash_reports_active_in_state() {
    let (app, _state) = create_test_app(FlashConfig::default());
    get(&app, "/lamp/flash?duration=2&flashes=1").await;
    advance_ms(100).await;

    let (_, body) = get(&app, "/lamp/state").await;
    assert_eq!(body, r#"{"powered":true,"active_flashes":1}"#);

    advance_ms(2_000).await;
    let (_, body) = get(&app, "/lamp/state").await;
    assert_eq!(body, r#"{"powered":false,"active_flashes":0}"#);
}

#[tokio::test(start_paused = true)]
async fn zero_flashes_is_client_error() {
    let (app, state) = create_test_app(FlashConfig::default());

    let (status, body) = get(&app, "/lamp/flash?flashes=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: ErrorResponse = serde_json::from_str(&body).unwrap();
    assert!(json.error.contains("flashes"));

    // Nothing was scheduled and the server still answers
    advance_ms(1_000).await;
    assert_eq!(state.with_lamp(|lamp| lamp.pin().write_count), 0);
    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn non_positive_values_rejected() {
    let (app, state) = create_test_app(FlashConfig::default());

    for uri in [
        "/lamp/flash?duration=0",
        "/lamp/flash?duration=-5",
        "/lamp/flash?flashes=-1",
        "/lamp/flash?duration=-1&flashes=0",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
    assert_eq!(state.active_flashes(), 0);
}

#[tokio::test(start_paused = true)]
async fn non_integer_values_rejected_as_json() {
    let (app, _state) = create_test_app(FlashConfig::default());

    for uri in ["/lamp/flash?duration=abc", "/lamp/flash?flashes=1.5"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        let json: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert!(json.error.starts_with("invalid request"));
    }
}

#[tokio::test(start_paused = true)]
async fn values_over_limit_rejected() {
    let config = FlashConfig::default()
        .with_max_duration_secs(10)
        .with_max_flashes(3);
    let (app, _state) = create_test_app(config);

    let (status, _) = get(&app, "/lamp/flash?duration=11&flashes=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/lamp/flash?duration=10&flashes=4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/lamp/flash?duration=10&flashes=3").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn overlapping_flashes_both_run() {
    let (app, state) = create_test_app(FlashConfig::default());

    let (first, _) = get(&app, "/lamp/flash?duration=2&flashes=1").await;
    let (second, _) = get(&app, "/lamp/flash?duration=2&flashes=1").await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    advance_ms(100).await;
    assert_eq!(state.active_flashes(), 2);

    advance_ms(2_000).await;
    assert_eq!(state.active_flashes(), 0);
    state.with_lamp(|lamp| {
        assert_eq!(lamp.pin().write_count, 4);
        assert_eq!(lamp.pin().level, PinLevel::Low);
    });
}

#[tokio::test(start_paused = true)]
async fn lamp_on_during_flash_is_overwritten_by_next_step() {
    let (app, state) = create_test_app(FlashConfig::default());
    get(&app, "/lamp/flash?duration=4&flashes=2").await;

    // During the first low phase
    advance_ms(1_500).await;
    let (_, body) = get(&app, "/lamp/on").await;
    assert_eq!(body, r#"{"status":"on"}"#);
    assert!(state.is_powered());

    // Last write wins: the flash keeps going and ends low
    advance_ms(3_000).await;
    assert!(!state.is_powered());
}

#[tokio::test(start_paused = true)]
async fn repeated_parameter_takes_last_value() {
    let (app, state) = create_test_app(FlashConfig::default());

    let (status, body) = get(&app, "/lamp/flash?flashes=1&duration=4&flashes=2").await;
    assert_eq!(status, StatusCode::OK);
    let json: FlashResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(json.flashes, 2);
    assert_eq!(json.duration, 4);

    advance_ms(4_100).await;
    state.with_lamp(|lamp| assert_eq!(lamp.pin().write_count, 4));
}

#[tokio::test(start_paused = true)]
async fn unknown_parameters_are_ignored() {
    let (app, _state) = create_test_app(FlashConfig::default());

    let (status, body) = get(&app, "/lamp/flash?duration=2&flashes=1&colour=red").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"flashing","duration":2,"flashes":1}"#);
}
