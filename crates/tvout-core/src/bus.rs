//! Transport contracts between the switching logic and the hardware.

use crate::{error::Error, standard::TvStandard};

/// A connected session on the encoder's control bus.
///
/// Register writes are strictly sequential and order dependent; implementors
/// must not reorder or batch them.
pub trait EncoderBus {
    /// Writes one byte to one encoder register.
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error>;

    /// Releases the session. A failure here is reported by the caller and is
    /// not fatal to the pass.
    fn close(self) -> Result<(), Error>;
}

/// Source of encoder bus sessions; the switching pass opens one session per
/// encoder phase.
///
/// `connect` is infallible by contract. When the underlying device cannot be
/// opened, implementors hand out a session whose writes fail individually, so
/// a missing bus degrades the pass instead of aborting it.
pub trait EncoderLink {
    type Bus: EncoderBus;

    fn connect(&mut self) -> Self::Bus;
}

/// Display controller output routing: internal panel vs. TV encoder.
pub trait DisplayRoute {
    /// Routes the display controller output for `target`.
    fn select(&mut self, target: TvStandard) -> Result<(), Error>;
}
