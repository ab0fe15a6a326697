//! Mock pin for testing without hardware.
//!
//! [`MockPin`] implements [`RelayPin`] and records every write so tests can
//! check both the final level and the sequence of levels that led there.
//!
//! # Example
//!
//! ```rust
//! use pi_lamp::LampController;
//! use pi_lamp::hal::MockPin;
//! use pi_lamp::traits::PinLevel;
//!
//! let mut lamp = LampController::new(MockPin::new());
//! lamp.turn_on().unwrap();
//! lamp.turn_off().unwrap();
//!
//! assert_eq!(lamp.pin().history, vec![PinLevel::High, PinLevel::Low]);
//! ```
//!
//! [`RelayPin`]: crate::traits::RelayPin

use log::trace;

use crate::traits::{PinLevel, RelayPin};

/// Mock relay pin for testing.
///
/// Records all writes for verification. Use the public fields to inspect
/// state after test operations. Set [`faulted`](Self::faulted) to make every
/// write fail, simulating an inaccessible line.
///
/// # Example
///
/// ```rust
/// use pi_lamp::hal::MockPin;
/// use pi_lamp::traits::{PinLevel, RelayPin};
///
/// let mut pin = MockPin::new();
/// pin.set_high().unwrap();
/// pin.set_high().unwrap();
///
/// assert_eq!(pin.level, PinLevel::High);
/// assert_eq!(pin.write_count, 2);
///
/// let mut broken = MockPin::new().faulted();
/// assert!(broken.set_high().is_err());
/// assert_eq!(broken.level, PinLevel::Low);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockPin {
    /// Current output level.
    pub level: PinLevel,
    /// Every level written, in order.
    pub history: Vec<PinLevel>,
    /// Number of successful writes.
    pub write_count: usize,
    /// When set, every write fails and the level is left unchanged.
    pub faulted: bool,
    /// Simulated BCM pin number.
    pub number: Option<u8>,
}

impl MockPin {
    /// Creates a new mock pin, driven low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock pin reporting the given BCM number.
    pub fn with_number(mut self, number: u8) -> Self {
        self.number = Some(number);
        self
    }

    /// Creates a mock pin whose writes always fail.
    pub fn faulted(mut self) -> Self {
        self.faulted = true;
        self
    }

    /// Number of low-to-high transitions recorded in the history.
    pub fn rising_edges(&self) -> usize {
        let mut previous = PinLevel::Low;
        let mut edges = 0;
        for &level in &self.history {
            if previous == PinLevel::Low && level == PinLevel::High {
                edges += 1;
            }
            previous = level;
        }
        edges
    }

    fn write(&mut self, level: PinLevel) -> Result<(), ()> {
        if self.faulted {
            return Err(());
        }
        trace!("mock pin {:?} -> {}", self.number, level);
        self.level = level;
        self.history.push(level);
        self.write_count += 1;
        Ok(())
    }
}

impl RelayPin for MockPin {
    type Error = ();

    fn set_high(&mut self) -> Result<(), ()> {
        self.write(PinLevel::High)
    }

    fn set_low(&mut self) -> Result<(), ()> {
        self.write(PinLevel::Low)
    }

    fn level(&self) -> PinLevel {
        self.level
    }

    fn number(&self) -> Option<u8> {
        self.number
    }
}
