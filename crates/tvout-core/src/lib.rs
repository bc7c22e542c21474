//! Driver logic for the composite TV-out path of the Dingoo A-320.
//!
//! The A-320 routes its framebuffer either to the internal SLCD or to a
//! Chrontel CH7024 encoder that turns the pixel stream into a composite
//! NTSC/PAL signal. This crate owns the hardware-facing policy: the encoder
//! register map and programming sequences ([`encoder`]), the transport
//! contracts that hardware backends implement ([`bus`]), and the fixed
//! switching pass that ties them together ([`switching`]). Actual device
//! access (the I2C character device, the framebuffer ioctl) lives with the
//! binary, so everything here runs against mock transports in tests.
//!
//! Hardware access is best effort throughout: failures are logged and the
//! pass keeps going, because register writes have no rollback and a
//! half-configured encoder is still recovered by the next pass's power-down.

pub mod bus;
pub mod encoder;
pub mod error;
pub mod standard;
pub mod switching;

pub use bus::{DisplayRoute, EncoderBus, EncoderLink};
pub use error::Error;
pub use standard::TvStandard;
pub use switching::switch;
