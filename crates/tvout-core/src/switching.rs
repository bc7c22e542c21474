//! The fixed TV-out switching pass.
//!
//! Ordering here is load bearing: the encoder is forced down before the
//! display route changes, and only a successfully routed, non-off target is
//! powered back up. Steps are strictly linear; nothing is retried and no
//! failure aborts the pass early, with one exception: when the routing call
//! is rejected there is no signal path to configure, so the encoder is left
//! powered down.

use tracing::{error, warn};

use crate::{
    bus::{DisplayRoute, EncoderBus, EncoderLink},
    encoder,
    standard::TvStandard,
};

/// Runs one switching pass for `target` against the given transports.
pub fn switch<L, R>(link: &mut L, route: &mut R, target: TvStandard)
where
    L: EncoderLink,
    R: DisplayRoute,
{
    encoder_phase(link, encoder::power_down);

    if let Err(err) = route.select(target) {
        error!("{err}");
        return;
    }

    if target != TvStandard::Off {
        encoder_phase(link, |bus| encoder::configure(bus, target));
    }
}

/// One encoder bus session: connect, run the phase, release.
fn encoder_phase<L: EncoderLink>(link: &mut L, phase: impl FnOnce(&mut L::Bus)) {
    let mut bus = link.connect();
    phase(&mut bus);
    if let Err(err) = bus.close() {
        warn!("{err}");
    }
}
