//! Lamp controller that owns the relay pin.
//!
//! [`LampController`] is the only thing that writes the pin. It turns the
//! lamp on and off, applies single flash steps, and reports a [`LampState`]
//! snapshot for the API.
//!
//! # Example
//!
//! ```rust
//! use pi_lamp::{LampController, PinLevel, hal::MockPin};
//!
//! let mut lamp = LampController::new(MockPin::new());
//!
//! // Writes are idempotent at the pin level
//! lamp.turn_on().unwrap();
//! lamp.turn_on().unwrap();
//! assert!(lamp.is_powered());
//! assert_eq!(lamp.pin().history, vec![PinLevel::High, PinLevel::High]);
//! ```

use log::error;

use crate::error::LampError;
use crate::traits::{PinLevel, RelayPin};

/// Snapshot of the lamp for UI/API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LampState {
    /// Whether the relay is closed.
    pub powered: bool,
    /// BCM pin number, if known.
    pub pin: Option<u8>,
}

/// Controller for a single relay-driven lamp.
///
/// # Type Parameter
///
/// - `P`: The relay pin implementation ([`RelayPin`] trait)
///
/// # Thread Safety
///
/// The controller itself is not thread-safe. The HTTP service wraps it in
/// `SharedLampState`, which serializes every write behind a mutex.
pub struct LampController<P: RelayPin> {
    pin: P,
}

impl<P: RelayPin> LampController<P> {
    /// Create a controller around an already configured pin.
    ///
    /// The pin keeps whatever level it had; no write happens here.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Close the relay.
    pub fn turn_on(&mut self) -> Result<LampState, LampError> {
        self.set_level(PinLevel::High)
    }

    /// Open the relay.
    pub fn turn_off(&mut self) -> Result<LampState, LampError> {
        self.set_level(PinLevel::Low)
    }

    /// Switch the lamp to `powered`.
    pub fn set_powered(&mut self, powered: bool) -> Result<LampState, LampError> {
        self.set_level(PinLevel::from(powered))
    }

    /// Drive the pin to `level`.
    pub fn set_level(&mut self, level: PinLevel) -> Result<LampState, LampError> {
        self.pin.set_level(level).map_err(|e| {
            error!("relay pin {:?} write {} failed: {:?}", self.pin.number(), level, e);
            LampError::pin(e)
        })?;
        Ok(self.state())
    }

    /// Whether the relay is currently closed.
    pub fn is_powered(&self) -> bool {
        self.pin.level().is_high()
    }

    /// Current lamp snapshot.
    pub fn state(&self) -> LampState {
        LampState {
            powered: self.is_powered(),
            pin: self.pin.number(),
        }
    }

    /// Access the pin.
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Mutable access to the pin.
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}
