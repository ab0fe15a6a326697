//! Error types for lamp operations.
//!
//! [`LampError`] covers both rejected input and hardware faults. Use
//! [`LampError::is_client_error`] to tell them apart when mapping to a
//! response.

use thiserror::Error;

/// Errors raised by lamp and flash operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LampError {
    /// A numeric parameter was zero or negative.
    #[error("`{field}` must be a positive integer, got {value}")]
    NonPositive {
        /// Parameter name.
        field: &'static str,
        /// Value supplied by the caller.
        value: i64,
    },
    /// A numeric parameter exceeded its configured limit.
    #[error("`{field}` must be at most {max}, got {value}")]
    AboveLimit {
        /// Parameter name.
        field: &'static str,
        /// Value supplied by the caller.
        value: i64,
        /// Configured maximum.
        max: u32,
    },
    /// The request could not be parsed.
    #[error("invalid request: {0}")]
    InvalidQuery(String),
    /// Writing the relay pin failed.
    #[error("pin write failed: {0}")]
    Pin(String),
}

impl LampError {
    /// Builds a [`LampError::Pin`] from a backend error.
    pub fn pin<E: core::fmt::Debug>(err: E) -> Self {
        LampError::Pin(format!("{:?}", err))
    }

    /// Returns `true` if the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LampError::Pin(_))
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}
