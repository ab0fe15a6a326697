//! Shared configuration for the relay pin, web server and flash limits.
//!
//! # Example
//!
//! ```rust
//! use pi_lamp::config::{Config, LampConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.lamp.pin, 17);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_lamp(LampConfig::default().with_pin(27))
//!     .with_web(WebConfig::default().with_port(3000));
//! ```
//!
//! # Environment
//!
//! [`Config::from_env`] overlays these variables onto the defaults:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PI_LAMP_PIN` | `lamp.pin` |
//! | `PI_LAMP_RESET_ON_DROP` | `lamp.reset_on_drop` |
//! | `PI_LAMP_MOCK` | `lamp.mock` |
//! | `PI_LAMP_HOST` | `web.host` |
//! | `PI_LAMP_PORT` | `web.port` |
//! | `PI_LAMP_CORS` | `web.cors_permissive` |

use thiserror::Error;

/// Prefix shared by all environment variables.
pub const ENV_PREFIX: &str = "PI_LAMP_";

/// Error raised when an environment variable holds an unusable value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The value could not be parsed.
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        /// Variable name.
        var: String,
        /// Raw value.
        value: String,
        /// What was expected.
        expected: &'static str,
    },
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Relay pin configuration
    pub lamp: LampConfig,
    /// Web server configuration
    pub web: WebConfig,
    /// Flash defaults and limits
    pub flash: FlashConfig,
}

impl Config {
    /// Set lamp configuration
    pub fn with_lamp(mut self, lamp: LampConfig) -> Self {
        self.lamp = lamp;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set flash configuration
    pub fn with_flash(mut self, flash: FlashConfig) -> Self {
        self.flash = flash;
        self
    }

    /// Defaults overlaid with `PI_LAMP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with variables from `lookup`.
    ///
    /// `lookup` receives the full variable name, e.g. `PI_LAMP_PORT`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |suffix: &str| {
            let var = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&var).map(|value| (var, value))
        };

        if let Some((var, value)) = get("PIN") {
            config.lamp.pin = parse_number(&var, &value, "BCM pin number")?;
        }
        if let Some((var, value)) = get("RESET_ON_DROP") {
            config.lamp.reset_on_drop = parse_bool(&var, &value)?;
        }
        if let Some((var, value)) = get("MOCK") {
            config.lamp.mock = parse_bool(&var, &value)?;
        }
        if let Some((_, value)) = get("HOST") {
            config.web.host = value.trim().to_string();
        }
        if let Some((var, value)) = get("PORT") {
            config.web.port = parse_number(&var, &value, "port")?;
        }
        if let Some((var, value)) = get("CORS") {
            config.web.cors_permissive = parse_bool(&var, &value)?;
        }

        Ok(config)
    }
}

fn parse_number<T: core::str::FromStr>(
    var: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var: var.to_string(),
        value: value.to_string(),
        expected,
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: var.to_string(),
            value: value.to_string(),
            expected: "boolean",
        }),
    }
}

// ============================================================================
// Lamp Config
// ============================================================================

/// Relay pin configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LampConfig {
    /// BCM pin number driving the relay (GPIO17 = physical pin 11)
    pub pin: u8,
    /// Restore the pin to its original mode when released
    pub reset_on_drop: bool,
    /// Drive a mock pin instead of real GPIO
    pub mock: bool,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            pin: 17,
            reset_on_drop: true,
            mock: false,
        }
    }
}

impl LampConfig {
    /// Set the BCM pin number
    pub fn with_pin(mut self, pin: u8) -> Self {
        self.pin = pin;
        self
    }

    /// Set whether the pin is reset when released
    pub fn with_reset_on_drop(mut self, reset: bool) -> Self {
        self.reset_on_drop = reset;
        self
    }

    /// Use a mock pin
    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Host or IP to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_permissive: true,
        }
    }
}

impl WebConfig {
    /// Set the bind host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// `host:port` string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Flash Config
// ============================================================================

/// Flash defaults and limits
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashConfig {
    /// Duration used when the request omits one
    pub default_duration_secs: u32,
    /// Flash count used when the request omits one
    pub default_flashes: u32,
    /// Longest accepted duration
    pub max_duration_secs: u32,
    /// Most accepted flashes
    pub max_flashes: u32,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: 5,
            default_flashes: 5,
            max_duration_secs: 3600,
            max_flashes: 1000,
        }
    }
}

impl FlashConfig {
    /// Set the default duration
    pub fn with_default_duration_secs(mut self, secs: u32) -> Self {
        self.default_duration_secs = secs;
        self
    }

    /// Set the default flash count
    pub fn with_default_flashes(mut self, flashes: u32) -> Self {
        self.default_flashes = flashes;
        self
    }

    /// Set the longest accepted duration
    pub fn with_max_duration_secs(mut self, secs: u32) -> Self {
        self.max_duration_secs = secs;
        self
    }

    /// Set the most accepted flashes
    pub fn with_max_flashes(mut self, flashes: u32) -> Self {
        self.max_flashes = flashes;
        self
    }
}
