//! Trait definitions for hardware abstraction.
//!
//! The only hardware pi-lamp touches is a single relay output line, modelled
//! by [`RelayPin`]. Implementations live in [`crate::hal`]:
//!
//! - `MockPin`: records writes for tests and desktop runs
//! - `RppalPin`: Raspberry Pi GPIO (requires `rpi` feature)

pub mod hardware;

pub use hardware::*;
