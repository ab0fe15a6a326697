//! Axum-based HTTP server for the lamp API.
//!
//! Provides endpoints for:
//! - GET `/lamp/on` - Close the relay
//! - GET `/lamp/off` - Open the relay
//! - GET `/lamp/flash?duration=D&flashes=F` - Schedule a flash sequence
//! - GET `/lamp/state` - Current lamp state
//! - GET `/health` - Liveness check

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{debug, info};
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::traits::RelayPin;
use crate::{FlashRequest, LampError};

use super::api::{ErrorResponse, FlashResponse, HealthResponse, StateResponse, StatusResponse};
use super::flasher::spawn_flash;
use super::shared::SharedLampState;

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /lamp/on - Close the relay
async fn lamp_on<P: RelayPin + Send + 'static>(
    State(state): State<Arc<SharedLampState<P>>>,
) -> Result<Json<StatusResponse>, LampError> {
    let lamp = state.with_lamp(|lamp| lamp.turn_on())?;
    info!("lamp on");
    Ok(Json(StatusResponse::powered(lamp.powered)))
}

/// GET /lamp/off - Open the relay
async fn lamp_off<P: RelayPin + Send + 'static>(
    State(state): State<Arc<SharedLampState<P>>>,
) -> Result<Json<StatusResponse>, LampError> {
    let lamp = state.with_lamp(|lamp| lamp.turn_off())?;
    info!("lamp off");
    Ok(Json(StatusResponse::powered(lamp.powered)))
}

/// GET /lamp/flash - Schedule a flash sequence
///
/// Accepts `duration` (seconds) and `flashes` query parameters, both
/// defaulting from the flash config. A repeated parameter takes its last
/// value. Returns before the first toggle.
async fn lamp_flash<P: RelayPin + Send + 'static>(
    State(state): State<Arc<SharedLampState<P>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<FlashResponse>, LampError> {
    let Query(pairs) = query.map_err(|e| LampError::InvalidQuery(e.body_text()))?;
    let request = FlashRequest::from_pairs(pairs)?;
    let plan = request.validate(state.flash_config())?;

    // Detached: no cancellation, no completion signal
    drop(spawn_flash(Arc::clone(&state), plan));

    Ok(Json(FlashResponse::from(&plan)))
}

/// GET /lamp/state - Current lamp state
async fn lamp_state<P: RelayPin + Send + 'static>(
    State(state): State<Arc<SharedLampState<P>>>,
) -> Json<StateResponse> {
    Json(StateResponse {
        powered: state.is_powered(),
        active_flashes: state.active_flashes(),
    })
}

/// GET /health - Liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not found")))
}

/// Log every request with its response status
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    debug!("{} {} -> {}", method, uri, response.status());
    response
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to (`host:port`)
    pub addr: String,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: config.bind_addr(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router<P: RelayPin + Send + 'static>(
    state: Arc<SharedLampState<P>>,
    config: &WebServerConfig,
) -> Router {
    let mut router = Router::new()
        .route("/lamp/on", get(lamp_on::<P>))
        .route("/lamp/off", get(lamp_off::<P>))
        .route("/lamp/flash", get(lamp_flash::<P>))
        .route("/lamp/state", get(lamp_state::<P>))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_request));

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server with shared state
///
/// Runs until `shutdown` resolves, then waits for in-flight requests.
/// Background flash tasks are not awaited.
pub async fn run_server_with_state<P, S>(
    state: Arc<SharedLampState<P>>,
    config: WebServerConfig,
    shutdown: S,
) -> Result<(), std::io::Error>
where
    P: RelayPin + Send + 'static,
    S: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    serve_on(listener, state, &config, shutdown).await
}

/// Serve on an already bound listener
///
/// Useful when binding port 0 and reading the address back.
pub async fn serve_on<P, S>(
    listener: tokio::net::TcpListener,
    state: Arc<SharedLampState<P>>,
    config: &WebServerConfig,
    shutdown: S,
) -> Result<(), std::io::Error>
where
    P: RelayPin + Send + 'static,
    S: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state, config);
    info!("web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown requested");
}
