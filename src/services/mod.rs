//! Network services for the lamp HTTP API.
//!
//! This module wires the [`LampController`](crate::LampController) to an
//! Axum router:
//!
//! - `shared`: `SharedLampState`, the mutex-guarded controller every handler uses
//! - `api`: JSON response types and error mapping
//! - `flasher`: detached background flash tasks
//! - `web`: routes, server builder and shutdown signal
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pi_lamp::services::{run_server_with_state, shutdown_signal, SharedLampState, WebServerConfig};
//!
//! let state = Arc::new(SharedLampState::new(controller, config.flash.clone()));
//! run_server_with_state(state, WebServerConfig::from_config(&config.web), shutdown_signal()).await?;
//! ```

pub mod api;
pub mod flasher;
pub mod shared;
pub mod web;

pub use api::*;
pub use flasher::*;
pub use shared::*;
pub use web::*;
