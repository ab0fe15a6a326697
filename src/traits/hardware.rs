//! Hardware abstraction for the relay output pin.
//!
//! The lamp is switched by a relay on a single GPIO output line. Everything
//! above this module talks to the line through [`RelayPin`], so the same
//! controller runs against a Raspberry Pi pin or a desktop mock.
//!
//! # Example
//!
//! ```rust
//! use pi_lamp::traits::{PinLevel, RelayPin};
//! use pi_lamp::hal::MockPin;
//!
//! let mut pin = MockPin::new();
//! pin.set_high().unwrap();
//! assert_eq!(pin.level(), PinLevel::High);
//! ```

/// Logic level of a GPIO output line.
///
/// # Default
///
/// Defaults to [`Low`](Self::Low), which leaves the relay open and the lamp off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PinLevel {
    /// Line driven low (lamp off).
    #[default]
    Low,
    /// Line driven high (lamp on).
    High,
}

impl PinLevel {
    /// Returns the level as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use pi_lamp::PinLevel;
    ///
    /// assert_eq!(PinLevel::High.as_str(), "high");
    /// assert_eq!(PinLevel::Low.as_str(), "low");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PinLevel::Low => "low",
            PinLevel::High => "high",
        }
    }

    /// Returns `true` for [`High`](Self::High).
    #[inline]
    pub const fn is_high(&self) -> bool {
        matches!(self, PinLevel::High)
    }

    /// Returns the opposite level.
    #[inline]
    pub const fn toggled(&self) -> Self {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

impl core::fmt::Display for PinLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relay pin trait - abstracts a single GPIO output line.
///
/// Implement this for your GPIO backend. Writes are expected to take effect
/// immediately; there is no buffering or deferred commit.
///
/// # Implementation Notes
///
/// - `set_high` closes the relay, `set_low` opens it
/// - `level` reports the last level written, not a read-back of the wire
/// - Backends whose writes cannot fail should use
///   [`Infallible`](core::convert::Infallible) as the error type
///
/// # Example Implementation
///
/// ```rust,ignore
/// use pi_lamp::traits::{PinLevel, RelayPin};
///
/// struct MyPin { /* hardware handle */ }
///
/// impl RelayPin for MyPin {
///     type Error = std::io::Error;
///
///     fn set_high(&mut self) -> Result<(), Self::Error> {
///         // write 1 to the line...
///         Ok(())
///     }
///
///     fn set_low(&mut self) -> Result<(), Self::Error> {
///         // write 0 to the line...
///         Ok(())
///     }
///
///     fn level(&self) -> PinLevel {
///         PinLevel::Low
///     }
/// }
/// ```
pub trait RelayPin {
    /// Error type returned by pin writes.
    type Error: core::fmt::Debug;

    /// Drive the line high.
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Drive the line low.
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Current output level.
    fn level(&self) -> PinLevel;

    /// BCM pin number, if the backend has one.
    fn number(&self) -> Option<u8> {
        None
    }

    /// Drive the line to `level`.
    fn set_level(&mut self, level: PinLevel) -> Result<(), Self::Error> {
        match level {
            PinLevel::High => self.set_high(),
            PinLevel::Low => self.set_low(),
        }
    }
}
