use clap::Parser;
use tracing::Level;
use tvout_core::TvStandard;

/// Ids of the standard-selection flags; each overrides all of them so the
/// last one on the command line wins.
const STANDARD_FLAGS: [&str; 5] = ["ntsc", "pal", "pal_m", "pal_60", "off"];

/// Dingoo A-320 TV-out control.
///
/// Clap's built-in help is disabled: usage must land on stderr with exit
/// status 0, and `--help` anywhere must win over any selected standard, so
/// the flag is resolved by [`Args::target`] instead.
#[derive(Parser, Debug)]
#[command(name = "tvout")]
#[command(about = "Switch the Dingoo A-320 between the internal LCD and composite TV output")]
#[command(long_about = None)]
#[command(disable_help_flag = true)]
pub struct Args {
    /// Output an NTSC-M signal
    #[arg(long, overrides_with_all = STANDARD_FLAGS)]
    pub ntsc: bool,

    /// Output a PAL-B/D/G/H/K/I signal
    #[arg(long, overrides_with_all = STANDARD_FLAGS)]
    pub pal: bool,

    /// Output a PAL-M signal
    #[arg(long = "pal-m", overrides_with_all = STANDARD_FLAGS)]
    pub pal_m: bool,

    /// Output a PAL-encoded signal at 60 Hz
    #[arg(long = "pal-60", overrides_with_all = STANDARD_FLAGS)]
    pub pal_60: bool,

    /// Turn TV output off and re-enable the LCD
    #[arg(long, overrides_with_all = STANDARD_FLAGS)]
    pub off: bool,

    /// Display this help and exit
    #[arg(long)]
    pub help: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

impl Args {
    /// Resolved selection. `None` means "print usage, touch no hardware":
    /// either no standard flag was given or `--help` appeared anywhere.
    pub fn target(&self) -> Option<TvStandard> {
        if self.help {
            return None;
        }
        // At most one of these survives parsing thanks to the overrides, so
        // the check order never breaks a tie.
        if self.off {
            Some(TvStandard::Off)
        } else if self.ntsc {
            Some(TvStandard::Ntsc)
        } else if self.pal {
            Some(TvStandard::Pal)
        } else if self.pal_60 {
            Some(TvStandard::Pal60)
        } else if self.pal_m {
            Some(TvStandard::PalM)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tvout").chain(extra.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn maps_every_standard_flag() {
        assert_eq!(parse(&["--ntsc"]).target(), Some(TvStandard::Ntsc));
        assert_eq!(parse(&["--pal"]).target(), Some(TvStandard::Pal));
        assert_eq!(parse(&["--pal-m"]).target(), Some(TvStandard::PalM));
        assert_eq!(parse(&["--pal-60"]).target(), Some(TvStandard::Pal60));
        assert_eq!(parse(&["--off"]).target(), Some(TvStandard::Off));
    }

    #[test]
    fn last_standard_flag_wins() {
        assert_eq!(
            parse(&["--ntsc", "--pal-60"]).target(),
            Some(TvStandard::Pal60)
        );
        assert_eq!(
            parse(&["--pal-60", "--ntsc"]).target(),
            Some(TvStandard::Ntsc)
        );
        assert_eq!(
            parse(&["--off", "--pal", "--pal-m"]).target(),
            Some(TvStandard::PalM)
        );
    }

    #[test]
    fn repeating_a_flag_is_allowed() {
        assert_eq!(parse(&["--pal", "--pal"]).target(), Some(TvStandard::Pal));
    }

    #[test]
    fn no_flags_resolves_to_usage() {
        assert_eq!(parse(&[]).target(), None);
    }

    #[test]
    fn help_wins_regardless_of_position() {
        assert_eq!(parse(&["--help", "--pal"]).target(), None);
        assert_eq!(parse(&["--pal", "--help"]).target(), None);
    }

    #[test]
    fn rejects_unknown_flags_naming_the_token() {
        let err = Args::try_parse_from(["tvout", "--bogus"]).unwrap_err();
        assert!(err.to_string().contains("--bogus"));
    }
}
