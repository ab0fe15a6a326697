//! API response types for the HTTP service.
//!
//! Bodies are kept flat and small, e.g. `{"status":"on"}`, so shell scripts
//! and home-automation tools can match them directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{FlashPlan, LampError};

// ============================================================================
// Response Types
// ============================================================================

/// Status reported by the lamp endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LampStatus {
    /// Relay closed
    On,
    /// Relay open
    Off,
    /// Flash sequence scheduled
    Flashing,
}

/// Response for `/lamp/on` and `/lamp/off`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// New lamp status
    pub status: LampStatus,
}

impl StatusResponse {
    /// Status for a lamp that is now powered or not
    pub fn powered(powered: bool) -> Self {
        Self {
            status: if powered {
                LampStatus::On
            } else {
                LampStatus::Off
            },
        }
    }
}

/// Response for `/lamp/flash`, echoing the scheduled parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashResponse {
    /// Always `flashing`
    pub status: LampStatus,
    /// Total duration in seconds
    pub duration: u32,
    /// Number of on/off cycles
    pub flashes: u32,
}

impl From<&FlashPlan> for FlashResponse {
    fn from(plan: &FlashPlan) -> Self {
        Self {
            status: LampStatus::Flashing,
            duration: plan.duration_secs(),
            flashes: plan.flashes(),
        }
    }
}

/// Response for `/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `true` while the process is serving
    pub ok: bool,
}

/// Response for `/lamp/state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResponse {
    /// Whether the relay is closed
    pub powered: bool,
    /// Flash sequences still running
    pub active_flashes: usize,
}

/// Error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
}

impl ErrorResponse {
    /// Create an error body
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl IntoResponse for LampError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Hardware detail stays in the log
        let body = if self.is_client_error() {
            debug!("rejected request: {}", self);
            ErrorResponse::new(self.to_string())
        } else {
            ErrorResponse::new("internal error")
        };

        (status, Json(body)).into_response()
    }
}
