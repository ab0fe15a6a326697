//! Relay lamp HTTP server.
//!
//! Serves the lamp API on `PI_LAMP_HOST:PI_LAMP_PORT` (default `0.0.0.0:8000`)
//! and drives the relay on BCM `PI_LAMP_PIN` (default GPIO17).
//!
//! # Build
//!
//! ```bash
//! # Raspberry Pi
//! cargo build --release --features rpi
//!
//! # Desktop, mock pin
//! cargo run
//! ```
//!
//! # Usage
//!
//! ```bash
//! curl http://raspberrypi.local:8000/lamp/on
//! curl "http://raspberrypi.local:8000/lamp/flash?duration=4&flashes=2"
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};
use pi_lamp::hal::MockPin;
use pi_lamp::services::{run_server_with_state, shutdown_signal, SharedLampState, WebServerConfig};
use pi_lamp::{Config, LampController, RelayPin};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "pi-lamp {} starting (GPIO{}, {})",
        env!("CARGO_PKG_VERSION"),
        config.lamp.pin,
        config.web.bind_addr()
    );

    if config.lamp.mock {
        warn!("PI_LAMP_MOCK is set; driving a mock pin");
        return serve(mock_pin(&config), &config).await;
    }

    serve_hardware(&config).await
}

fn mock_pin(config: &Config) -> MockPin {
    MockPin::new().with_number(config.lamp.pin)
}

#[cfg(feature = "rpi")]
async fn serve_hardware(config: &Config) -> anyhow::Result<()> {
    let pin = pi_lamp::hal::RppalPin::open(config.lamp.pin, config.lamp.reset_on_drop)
        .with_context(|| format!("failed to claim GPIO{}", config.lamp.pin))?;
    serve(pin, config).await
}

#[cfg(not(feature = "rpi"))]
async fn serve_hardware(config: &Config) -> anyhow::Result<()> {
    warn!("built without the `rpi` feature; driving a mock pin");
    serve(mock_pin(config), config).await
}

async fn serve<P: RelayPin + Send + 'static>(pin: P, config: &Config) -> anyhow::Result<()> {
    let state = Arc::new(SharedLampState::new(
        LampController::new(pin),
        config.flash.clone(),
    ));

    run_server_with_state(
        Arc::clone(&state),
        WebServerConfig::from_config(&config.web),
        shutdown_signal(),
    )
    .await
    .with_context(|| format!("web server on {} failed", config.web.bind_addr()))?;

    if state.active_flashes() > 0 {
        info!("stopping {} running flash(es)", state.active_flashes());
    }
    if let Err(e) = state.shutdown() {
        warn!("could not switch lamp off on shutdown: {}", e);
    }
    info!(
        "lamp off after {}s uptime, releasing GPIO",
        state.uptime_ms() / 1000
    );
    Ok(())
}
