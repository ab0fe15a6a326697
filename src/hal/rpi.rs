//! Raspberry Pi relay pin using `rppal`.
//!
//! The relay module's signal line is wired to a BCM-numbered GPIO. The
//! default is GPIO17 (physical pin 11).

use core::convert::Infallible;

use log::{debug, trace};
use rppal::gpio::{Gpio, OutputPin};

use crate::traits::{PinLevel, RelayPin};

/// Relay output line on a Raspberry Pi.
///
/// Writes on an acquired `OutputPin` cannot fail, so the error type is
/// [`Infallible`]. Failures (missing `/dev/gpiomem`, pin already claimed)
/// surface from [`RppalPin::open`].
///
/// # Hardware Setup
///
/// - GPIO17 → relay IN
/// - 5V / GND → relay VCC / GND
///
/// # Example
///
/// ```ignore
/// use pi_lamp::hal::RppalPin;
/// use pi_lamp::traits::RelayPin;
///
/// let mut pin = RppalPin::open(17, true)?;
/// pin.set_high()?;
/// ```
#[derive(Debug)]
pub struct RppalPin {
    pin: OutputPin,
}

impl RppalPin {
    /// Claims `bcm` as an output line, starting low.
    ///
    /// With `reset_on_drop`, rppal restores the line to its original mode
    /// when the pin is released, which normally switches the relay off.
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO peripheral cannot be opened or the pin is
    /// unavailable.
    pub fn open(bcm: u8, reset_on_drop: bool) -> Result<Self, rppal::gpio::Error> {
        let mut pin = Gpio::new()?.get(bcm)?.into_output_low();
        pin.set_reset_on_drop(reset_on_drop);
        debug!("claimed GPIO{} (reset_on_drop={})", bcm, reset_on_drop);
        Ok(Self { pin })
    }
}

impl RelayPin for RppalPin {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        trace!("GPIO{} high", self.pin.pin());
        self.pin.set_high();
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        trace!("GPIO{} low", self.pin.pin());
        self.pin.set_low();
        Ok(())
    }

    fn level(&self) -> PinLevel {
        PinLevel::from(self.pin.is_set_high())
    }

    fn number(&self) -> Option<u8> {
        Some(self.pin.pin())
    }
}
