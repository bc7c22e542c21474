use std::fmt;

/// Broadcast standard driven on the TV-out connector, or [`Off`] to hand the
/// display back to the internal panel.
///
/// The integer codes are the framebuffer driver's TV-out ioctl argument
/// values, so [`TvStandard::code`] passes through unchanged.
///
/// [`Off`]: TvStandard::Off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvStandard {
    /// TV output disabled, SLCD routing restored.
    Off,
    /// NTSC-M, 60 Hz.
    Ntsc,
    /// PAL-B/D/G/H/K/I, 50 Hz.
    Pal,
    /// PAL colour encoding on 60 Hz timings.
    Pal60,
    /// PAL-M, the Brazilian 60 Hz variant.
    PalM,
}

impl TvStandard {
    /// Integer code understood by the display-routing ioctl.
    pub fn code(self) -> i32 {
        match self {
            Self::Off => 0,
            Self::Ntsc => 1,
            Self::Pal => 2,
            Self::Pal60 => 3,
            Self::PalM => 4,
        }
    }
}

impl fmt::Display for TvStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Ntsc => "NTSC",
            Self::Pal => "PAL",
            Self::Pal60 => "PAL-60",
            Self::PalM => "PAL-M",
        };
        f.write_str(name)
    }
}
