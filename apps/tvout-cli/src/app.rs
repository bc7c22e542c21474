//! Wires the switching pass to the real devices.

use tracing::{info, warn};
use tvout_core::TvStandard;

use crate::{fb::FbRoute, i2c::SmbusLink};

/// Runs one best-effort switching pass. Hardware failures are logged as they
/// happen and do not change the exit status.
pub fn run(target: TvStandard) {
    info!("switching TV output to {target}");

    let mut route = FbRoute::open();
    let mut link = SmbusLink;
    tvout_core::switch(&mut link, &mut route, target);

    if let Err(err) = route.close() {
        warn!("{err}");
    }
}
