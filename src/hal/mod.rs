//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementation for desktop development
//! - `rpi`: Raspberry Pi GPIO through `rppal` (requires `rpi` feature)

pub mod mock;

#[cfg(feature = "rpi")]
pub mod rpi;

pub use mock::*;

#[cfg(feature = "rpi")]
pub use rpi::*;
