use std::io;

use thiserror::Error;

/// Failures raised by the hardware transports.
///
/// None of these abort a switching pass. Register programming is best effort
/// with no rollback, so callers report the failure and keep going.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to open {path}: {source}")]
    Open {
        path: &'static str,
        source: io::Error,
    },

    #[error("unable to claim encoder address {address:#04x}: {source}")]
    ClaimAddress { address: u16, source: io::Error },

    #[error("encoder register {reg:#04x} write rejected: {source}")]
    RegisterWrite { reg: u8, source: io::Error },

    #[error("failed to select TV-out mode: {source}")]
    RouteSelect { source: io::Error },

    #[error("unable to close {path}: {source}")]
    Close {
        path: &'static str,
        source: io::Error,
    },

    /// The encoder bus never opened; every write on the session fails with
    /// this until the session is released.
    #[error("encoder bus is not available")]
    BusUnavailable,

    /// The framebuffer device never opened, so routing cannot be switched.
    #[error("display controller is not available")]
    DisplayUnavailable,
}
