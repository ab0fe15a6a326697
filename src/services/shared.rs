//! Shared lamp state for the HTTP handlers and background flash tasks.
//!
//! `SharedLampState` owns the single [`LampController`] and hands out
//! short-lived access to it. Every pin write goes through the same mutex, so
//! writes never tear, but separate requests and flash sequences still
//! interleave at write granularity: the last write wins.
//!
//! [`SharedLampState::shutdown`] switches the lamp off for good: running
//! flash sequences see the closing flag before their next write and stop.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pi_lamp::{FlashConfig, LampController, hal::MockPin};
//! use pi_lamp::services::SharedLampState;
//!
//! let state = Arc::new(SharedLampState::new(
//!     LampController::new(MockPin::new()),
//!     FlashConfig::default(),
//! ));
//!
//! state.with_lamp(|lamp| lamp.turn_on()).unwrap();
//! assert!(state.is_powered());
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::config::FlashConfig;
use crate::error::LampError;
use crate::lamp::LampState;
use crate::traits::RelayPin;
use crate::LampController;

/// Shared state for all request handlers and flash tasks.
///
/// # Thread Safety
///
/// - Uses `Mutex` for controller access; critical sections are a single pin
///   write, so contention is negligible.
/// - A poisoned lock is recovered: the pin level is still meaningful after
///   a panic elsewhere.
/// - The in-flight flash count is a plain atomic, read without the lock.
pub struct SharedLampState<P: RelayPin> {
    /// The lamp controller
    lamp: Mutex<LampController<P>>,

    /// Flash defaults and limits
    flash_config: FlashConfig,

    /// Number of flash sequences currently running
    active_flashes: AtomicUsize,

    /// Set once shutdown has started
    closing: AtomicBool,

    /// Time when the state was created
    start_time: Instant,
}

impl<P: RelayPin> SharedLampState<P> {
    /// Create new shared state wrapping a controller.
    pub fn new(lamp: LampController<P>, flash_config: FlashConfig) -> Self {
        Self {
            lamp: Mutex::new(lamp),
            flash_config,
            active_flashes: AtomicUsize::new(0),
            closing: AtomicBool::new(false),
            start_time: Instant::now(),
        }
    }

    /// Access the controller with the lock held.
    ///
    /// The closure pattern prevents accidentally holding the lock across
    /// await points.
    pub fn with_lamp<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut LampController<P>) -> R,
    {
        let mut guard = self.lamp.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    /// Whether the relay is currently closed.
    pub fn is_powered(&self) -> bool {
        self.with_lamp(|lamp| lamp.is_powered())
    }

    /// Flash defaults and limits.
    pub fn flash_config(&self) -> &FlashConfig {
        &self.flash_config
    }

    /// Number of flash sequences currently running.
    pub fn active_flashes(&self) -> usize {
        self.active_flashes.load(Ordering::SeqCst)
    }

    /// Mark a flash sequence as running until the guard drops.
    pub fn begin_flash(&self) -> FlashGuard<'_> {
        self.active_flashes.fetch_add(1, Ordering::SeqCst);
        FlashGuard {
            counter: &self.active_flashes,
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    /// Stop flash sequences from writing and switch the lamp off.
    ///
    /// The flag is raised before the lock is taken, so any flash step that
    /// wins the lock first is overwritten by the final `off`, and every later
    /// step sees the flag and stops.
    ///
    /// # Errors
    ///
    /// [`LampError::Pin`] if the final write fails. The flag stays set.
    pub fn shutdown(&self) -> Result<LampState, LampError> {
        self.closing.store(true, Ordering::SeqCst);
        self.with_lamp(|lamp| lamp.turn_off())
    }

    /// Milliseconds since the state was created.
    #[inline]
    pub fn uptime_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Consume the state and release the controller.
    pub fn into_inner(self) -> LampController<P> {
        self.lamp.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a flash counted as active while alive.
pub struct FlashGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for FlashGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
