//! # pi-lamp
//!
//! A relay-driven lamp controller for single-board computers, with a small
//! HTTP API for switching the lamp, flashing it, and checking liveness.
//!
//! ## Features
//!
//! - **Hardware abstraction**: the [`RelayPin`] trait hides the GPIO backend
//! - **Flash plans**: validated on/off sequences spread evenly over a duration
//! - **HTTP API**: axum routes for on/off/flash/health (`web` feature)
//! - **Raspberry Pi support**: real pins via `rppal` (`rpi` feature)
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Pin abstraction
//! - `lamp` - Controller that owns the pin and tracks the lamp state
//! - `flash` - Flash request validation and step planning
//! - `config` - Pin, web and flash settings
//! - `hal` - Concrete pins (mock for testing, rppal for hardware)
//! - `services` - HTTP API and background flash tasks
//!
//! ## Example
//!
//! ```rust
//! use pi_lamp::{hal::MockPin, LampController};
//!
//! let mut lamp = LampController::new(MockPin::new());
//! lamp.turn_on().unwrap();
//! assert!(lamp.is_powered());
//!
//! lamp.turn_off().unwrap();
//! assert!(!lamp.is_powered());
//! ```

#![warn(missing_docs)]

/// Shared configuration for the pin, web server and flash limits.
pub mod config;
/// Error types for lamp operations.
pub mod error;
/// Flash request validation and step planning.
pub mod flash;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Lamp controller that owns the relay pin.
pub mod lamp;
/// Core traits for hardware abstraction.
pub mod traits;

/// Network services for the HTTP API (feature-gated).
#[cfg(feature = "web")]
pub mod services;

pub use config::{Config, ConfigError, FlashConfig, LampConfig, WebConfig};
pub use error::LampError;
pub use flash::{FlashPlan, FlashRequest, FlashStep, FlashSteps};
pub use lamp::{LampController, LampState};
pub use traits::{PinLevel, RelayPin};
