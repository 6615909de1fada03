//! Audio output: the player device seam and its `rodio` implementation.
//!
//! The controller only ever talks to [`PlayerDevice`]; the concrete
//! [`RodioDevice`] owns the output stream and at most one sink.

mod device;
mod rodio_device;
mod sink;

pub use device::{DeviceError, PlayerDevice};
pub use rodio_device::RodioDevice;

#[cfg(test)]
mod tests;
