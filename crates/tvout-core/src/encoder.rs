//! Chrontel CH7024 register map and programming sequences.
//!
//! The CH7024 sits on the A-320's control bus and converts the scaled
//! framebuffer into a composite NTSC/PAL signal. The bytes below are the
//! values the factory firmware programs the chip with. A few of them look
//! absurd against the datasheet (the horizontal input totals do not match
//! the line widths the chip actually encodes) but they are what the
//! hardware is known to produce a stable picture with, so they are kept
//! exactly as found.
//!
//! Registers whose firmware values equal the chip's power-on defaults
//! (`0x12`, `0x14`–`0x16`, `0x18`, `0x1a`, `0x1e`, `0x32`) are never
//! written.
//!
//! # Reference
//! - Chrontel CH7024 datasheet, register description section

use tracing::warn;

use crate::{bus::EncoderBus, standard::TvStandard};

/// Seven-bit control-bus address the encoder answers on.
pub const BUS_ADDRESS: u16 = 0x76;

/// Reset control; `0x00` forces a full reset into power-down, `0x03`
/// releases it.
const REG_RESET: u8 = 0x03;
/// Power management: DAC enables and the power-down bit.
pub const REG_POWER: u8 = 0x04;
/// Output format: scaler bypass, CVBS/S-Video switch, VOS standard code.
pub const REG_OUTPUT_FORMAT: u8 = 0x0a;
/// Crystal control.
const REG_CRYSTAL: u8 = 0x0b;
/// Input data format.
const REG_INPUT_FORMAT: u8 = 0x0d;
/// Sync control.
const REG_SYNC_CONTROL: u8 = 0x0e;
/// Input timing: HTI/HAI high bits (manual timing mode).
const REG_INPUT_TIMING_1: u8 = 0x11;
/// Input timing: HTI low byte.
const REG_INPUT_TIMING_3: u8 = 0x13;
/// Input timing: VSYNC offset.
const REG_INPUT_TIMING_7: u8 = 0x17;
/// Input timing: VTI/VAI high bits.
const REG_INPUT_TIMING_9: u8 = 0x19;
/// Output timing: TVHA low byte.
const REG_OUTPUT_TIMING_2: u8 = 0x1f;
/// Horizontal position, low byte.
pub const REG_H_POSITION: u8 = 0x23;
/// UCLK divider numerator, high byte; mid and low follow at `0x29`/`0x2a`.
const REG_UCLK_NUMERATOR: u8 = 0x28;
/// UCLK divider denominator, high byte; mid and low follow at `0x2c`/`0x2d`.
const REG_UCLK_DENOMINATOR: u8 = 0x2b;
/// PLL M value.
const REG_PLL_M: u8 = 0x2e;
/// PLL3 pre-divider and post-divider 1.
const REG_PLL_RATIO_1: u8 = 0x30;
/// PLL3 post-divider 2.
const REG_PLL_RATIO_2: u8 = 0x31;
/// Sub-carrier frequency adjustment.
const REG_FSCI_ADJUST: u8 = 0x33;
/// DAC termination control.
const REG_DAC_CONTROL: u8 = 0x63;

/// [`REG_POWER`] value disabling all DACs and powering the chip down.
pub const POWER_DOWN: u8 = 0xc1;
/// [`REG_POWER`] value enabling DAC0 and powering the chip up.
pub const POWER_UP: u8 = 0x08;

/// One step of the enable sequence.
struct RegWrite {
    reg: u8,
    value: RegValue,
}

/// Byte written by a step: shared across standards or selected per standard.
enum RegValue {
    Fixed(u8),
    PerStandard {
        ntsc: u8,
        pal: u8,
        pal60: u8,
        pal_m: u8,
    },
}

impl RegValue {
    /// Byte for `target`, or `None` for [`TvStandard::Off`], which has no
    /// enable sequence at all.
    fn resolve(&self, target: TvStandard) -> Option<u8> {
        let value = match (self, target) {
            (_, TvStandard::Off) => return None,
            (Self::Fixed(value), _) => *value,
            (Self::PerStandard { ntsc, .. }, TvStandard::Ntsc) => *ntsc,
            (Self::PerStandard { pal, .. }, TvStandard::Pal) => *pal,
            (Self::PerStandard { pal60, .. }, TvStandard::Pal60) => *pal60,
            (Self::PerStandard { pal_m, .. }, TvStandard::PalM) => *pal_m,
        };
        Some(value)
    }
}

/// Steps that differ only between 50 Hz PAL and the 60 Hz standards. PAL-60
/// and PAL-M run the NTSC-side timings and clocking.
const fn pal_or(pal: u8, others: u8) -> RegValue {
    RegValue::PerStandard {
        ntsc: others,
        pal,
        pal60: others,
        pal_m: others,
    }
}

/// Enable sequence, in hardware-mandated order: reset, output format,
/// clocking, input/output timing, PLL, and DAC power as the very last step.
const SETUP: &[RegWrite] = &[
    // Full reset into power-down, then release.
    RegWrite {
        reg: REG_RESET,
        value: RegValue::Fixed(0x00),
    },
    RegWrite {
        reg: REG_RESET,
        value: RegValue::Fixed(0x03),
    },
    // Scaler on, composite on the CVBS DAC; VOS selects the standard
    // (NTSC-M, PAL-B/D/G/H/K/I, PAL-60, PAL-M).
    RegWrite {
        reg: REG_OUTPUT_FORMAT,
        value: RegValue::PerStandard {
            ntsc: 0x10,
            pal: 0x13,
            pal60: 0x17,
            pal_m: 0x14,
        },
    },
    // Predefined 12 MHz crystal frequency.
    RegWrite {
        reg: REG_CRYSTAL,
        value: RegValue::Fixed(0x03),
    },
    // RGB565 input, no swapping or reversal.
    RegWrite {
        reg: REG_INPUT_FORMAT,
        value: RegValue::Fixed(0x03),
    },
    // Separate active-low syncs on CMOS-level inputs, nothing on POUT.
    RegWrite {
        reg: REG_SYNC_CONTROL,
        value: RegValue::Fixed(0x00),
    },
    // Manual input timing. HAI is 320 everywhere; HTI is 876 for PAL and
    // 736 otherwise. HSYNC width and offset stay at their defaults.
    RegWrite {
        reg: REG_INPUT_TIMING_1,
        value: pal_or(0x19, 0x11),
    },
    RegWrite {
        reg: REG_INPUT_TIMING_3,
        value: pal_or(0x6c, 0xe0),
    },
    // VSYNC offset 4; VTI is 548 for PAL and 544 otherwise, VAI 240.
    RegWrite {
        reg: REG_INPUT_TIMING_7,
        value: RegValue::Fixed(0x04),
    },
    RegWrite {
        reg: REG_INPUT_TIMING_9,
        value: pal_or(0x12, 0x10),
    },
    // TVHA = 1345 output pixels.
    RegWrite {
        reg: REG_OUTPUT_TIMING_2,
        value: RegValue::Fixed(0x41),
    },
    // Horizontal position: 503 for PAL (nine pixels left), 508 otherwise.
    // Vertical position and the PCLK divider stay at their defaults.
    RegWrite {
        reg: REG_H_POSITION,
        value: pal_or(0x7a, 0x7f),
    },
    // UCLK divider fraction: 1932288 / 2160000 for PAL,
    // 1597504 / 1801800 otherwise.
    RegWrite {
        reg: REG_UCLK_NUMERATOR,
        value: pal_or(0x1d, 0x18),
    },
    RegWrite {
        reg: REG_UCLK_NUMERATOR + 1,
        value: pal_or(0x7c, 0x60),
    },
    RegWrite {
        reg: REG_UCLK_NUMERATOR + 2,
        value: pal_or(0x00, 0x40),
    },
    RegWrite {
        reg: REG_UCLK_DENOMINATOR,
        value: pal_or(0x20, 0x1b),
    },
    RegWrite {
        reg: REG_UCLK_DENOMINATOR + 1,
        value: pal_or(0xf5, 0x7e),
    },
    RegWrite {
        reg: REG_UCLK_DENOMINATOR + 2,
        value: pal_or(0x80, 0x48),
    },
    // PLL: M value, then the PLL3 pre-divider (2) and post-dividers (2, 3).
    RegWrite {
        reg: REG_PLL_M,
        value: RegValue::Fixed(0x38),
    },
    RegWrite {
        reg: REG_PLL_RATIO_1,
        value: RegValue::Fixed(0x12),
    },
    RegWrite {
        reg: REG_PLL_RATIO_2,
        value: RegValue::Fixed(0x13),
    },
    // No sub-carrier adjustment.
    RegWrite {
        reg: REG_FSCI_ADJUST,
        value: RegValue::Fixed(0x00),
    },
    // Double termination on the active DAC.
    RegWrite {
        reg: REG_DAC_CONTROL,
        value: RegValue::Fixed(0xc2),
    },
    // DAC0 on, power up. Must stay last: everything above assumes the chip
    // is still dark.
    RegWrite {
        reg: REG_POWER,
        value: RegValue::Fixed(POWER_UP),
    },
];

/// Resolved `(register, value)` writes enabling `target`, in program order.
/// Empty for [`TvStandard::Off`].
pub fn setup_writes(target: TvStandard) -> impl Iterator<Item = (u8, u8)> {
    SETUP
        .iter()
        .filter_map(move |step| Some((step.reg, step.value.resolve(target)?)))
}

/// Forces the encoder down: DACs off, power-down bit set.
///
/// This is the first hardware touch of every switching pass, whatever the
/// target, so that any later configuration starts from a known chip state.
pub fn power_down<B: EncoderBus>(bus: &mut B) {
    write(bus, REG_POWER, POWER_DOWN);
}

/// Programs and powers up the encoder for `target`. Does nothing for
/// [`TvStandard::Off`].
pub fn configure<B: EncoderBus>(bus: &mut B, target: TvStandard) {
    for (reg, value) in setup_writes(target) {
        write(bus, reg, value);
    }
}

/// Best-effort register write: a rejected write is logged and the rest of
/// the sequence still runs, since there is no rollback to perform.
fn write<B: EncoderBus>(bus: &mut B, reg: u8, value: u8) {
    if let Err(err) = bus.write_register(reg, value) {
        warn!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const ENABLING: [TvStandard; 4] = [
        TvStandard::Ntsc,
        TvStandard::Pal,
        TvStandard::Pal60,
        TvStandard::PalM,
    ];

    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, u8)>,
    }

    impl EncoderBus for RecordingBus {
        fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error> {
            self.writes.push((reg, value));
            Ok(())
        }

        fn close(self) -> Result<(), Error> {
            Ok(())
        }
    }

    struct RejectingBus {
        attempts: usize,
    }

    impl EncoderBus for RejectingBus {
        fn write_register(&mut self, _reg: u8, _value: u8) -> Result<(), Error> {
            self.attempts += 1;
            Err(Error::BusUnavailable)
        }

        fn close(self) -> Result<(), Error> {
            Ok(())
        }
    }

    fn writes_for(target: TvStandard) -> Vec<(u8, u8)> {
        let mut bus = RecordingBus::default();
        configure(&mut bus, target);
        bus.writes
    }

    fn value_of(writes: &[(u8, u8)], reg: u8) -> u8 {
        writes
            .iter()
            .find(|(r, _)| *r == reg)
            .map(|(_, value)| *value)
            .expect("register is written by the sequence")
    }

    fn divider_bytes(writes: &[(u8, u8)]) -> [u8; 6] {
        let mut bytes = [0; 6];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = value_of(writes, REG_UCLK_NUMERATOR + offset as u8);
        }
        bytes
    }

    #[test]
    fn power_down_is_a_single_disable_write() {
        let mut bus = RecordingBus::default();
        power_down(&mut bus);
        assert_eq!(bus.writes, vec![(REG_POWER, POWER_DOWN)]);
    }

    #[test]
    fn off_has_no_enable_sequence() {
        assert!(writes_for(TvStandard::Off).is_empty());
    }

    #[test]
    fn every_standard_touches_the_same_registers() {
        let ntsc: Vec<u8> = writes_for(TvStandard::Ntsc)
            .iter()
            .map(|(reg, _)| *reg)
            .collect();
        for standard in [TvStandard::Pal, TvStandard::Pal60, TvStandard::PalM] {
            let regs: Vec<u8> = writes_for(standard).iter().map(|(reg, _)| *reg).collect();
            assert_eq!(regs, ntsc, "register order diverged for {standard}");
        }
    }

    #[test]
    fn reset_runs_first_and_power_up_last() {
        for standard in ENABLING {
            let writes = writes_for(standard);
            assert_eq!(&writes[..2], &[(REG_RESET, 0x00), (REG_RESET, 0x03)]);
            assert_eq!(writes.last(), Some(&(REG_POWER, POWER_UP)));
        }
    }

    #[test]
    fn format_codes_follow_the_selected_standard() {
        let format = |standard| value_of(&writes_for(standard), REG_OUTPUT_FORMAT);
        assert_eq!(format(TvStandard::Ntsc), 0x10);
        assert_eq!(format(TvStandard::Pal), 0x13);
        assert_eq!(format(TvStandard::Pal60), 0x17);
        assert_eq!(format(TvStandard::PalM), 0x14);
    }

    #[test]
    fn only_documented_registers_vary_between_standards() {
        let ntsc = writes_for(TvStandard::Ntsc);
        let pal = writes_for(TvStandard::Pal);
        let differing: Vec<u8> = ntsc
            .iter()
            .zip(&pal)
            .filter(|(a, b)| a.1 != b.1)
            .map(|(a, _)| a.0)
            .collect();
        assert_eq!(
            differing,
            vec![
                REG_OUTPUT_FORMAT,
                REG_INPUT_TIMING_1,
                REG_INPUT_TIMING_3,
                REG_INPUT_TIMING_9,
                REG_H_POSITION,
                REG_UCLK_NUMERATOR,
                REG_UCLK_NUMERATOR + 1,
                REG_UCLK_NUMERATOR + 2,
                REG_UCLK_DENOMINATOR,
                REG_UCLK_DENOMINATOR + 1,
                REG_UCLK_DENOMINATOR + 2,
            ]
        );

        // The 60 Hz PAL variants reuse the NTSC timings wholesale; only the
        // format code changes.
        for standard in [TvStandard::Pal60, TvStandard::PalM] {
            let writes = writes_for(standard);
            let differing: Vec<u8> = ntsc
                .iter()
                .zip(&writes)
                .filter(|(a, b)| a.1 != b.1)
                .map(|(a, _)| a.0)
                .collect();
            assert_eq!(differing, vec![REG_OUTPUT_FORMAT]);
        }
    }

    #[test]
    fn pal_timing_and_divider_bytes_match_the_firmware() {
        let pal = writes_for(TvStandard::Pal);
        assert_eq!(value_of(&pal, REG_INPUT_TIMING_1), 0x19);
        assert_eq!(value_of(&pal, REG_INPUT_TIMING_3), 0x6c);
        assert_eq!(value_of(&pal, REG_INPUT_TIMING_9), 0x12);
        assert_eq!(value_of(&pal, REG_H_POSITION), 0x7a);
        assert_eq!(divider_bytes(&pal), [0x1d, 0x7c, 0x00, 0x20, 0xf5, 0x80]);
    }

    #[test]
    fn ntsc_timing_and_divider_bytes_match_the_firmware() {
        let ntsc = writes_for(TvStandard::Ntsc);
        assert_eq!(value_of(&ntsc, REG_INPUT_TIMING_1), 0x11);
        assert_eq!(value_of(&ntsc, REG_INPUT_TIMING_3), 0xe0);
        assert_eq!(value_of(&ntsc, REG_INPUT_TIMING_9), 0x10);
        assert_eq!(value_of(&ntsc, REG_H_POSITION), 0x7f);
        assert_eq!(divider_bytes(&ntsc), [0x18, 0x60, 0x40, 0x1b, 0x7e, 0x48]);
    }

    #[test]
    fn default_registers_are_left_unwritten() {
        let writes = writes_for(TvStandard::Ntsc);
        for reg in [0x12, 0x14, 0x15, 0x16, 0x18, 0x1a, 0x1e, 0x32] {
            assert!(
                !writes.iter().any(|(r, _)| *r == reg),
                "register {reg:#04x} must stay at its hardware default"
            );
        }
    }

    #[test]
    fn rejected_writes_do_not_stop_the_sequence() {
        let mut bus = RejectingBus { attempts: 0 };
        configure(&mut bus, TvStandard::Ntsc);
        assert_eq!(bus.attempts, SETUP.len());
    }
}
