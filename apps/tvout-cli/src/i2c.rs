//! Encoder access over the I2C character device.
//!
//! The encoder hangs off the SoC's first I2C controller. Each register write
//! is a single SMBus byte-data transaction issued directly through
//! `ioctl(I2C_SMBUS)`, so every write reports failure on its own (device
//! missing, address rejected, transfer rejected) instead of disappearing
//! into a helper process.

use std::{
    fs::{File, OpenOptions},
    io,
    os::fd::{AsRawFd, IntoRawFd},
};

use tracing::error;
use tvout_core::{EncoderBus, EncoderLink, Error, encoder};

/// Control-bus device node.
pub const I2C_PATH: &str = "/dev/i2c-0";

// Constant-argument requests from <linux/i2c-dev.h>.
const I2C_SLAVE: libc::c_ulong = 0x0703;
const I2C_SMBUS: libc::c_ulong = 0x0720;

const I2C_SMBUS_WRITE: u8 = 0;
const I2C_SMBUS_BYTE_DATA: u32 = 2;
/// Block transfers carry up to 32 data bytes plus length and PEC slots.
const I2C_SMBUS_BLOCK_MAX: usize = 32;

/// Mirror of `union i2c_smbus_data`; only `byte` is ever written, the other
/// fields keep the kernel-visible size and alignment.
#[repr(C)]
#[allow(dead_code)]
union I2cSmbusData {
    byte: u8,
    word: u16,
    block: [u8; I2C_SMBUS_BLOCK_MAX + 2],
}

/// Mirror of `struct i2c_smbus_ioctl_data`.
#[repr(C)]
struct I2cSmbusIoctlData {
    read_write: u8,
    command: u8,
    size: u32,
    data: *mut I2cSmbusData,
}

/// An open control-bus device bound to the encoder's address.
struct SmbusDevice {
    file: File,
}

impl SmbusDevice {
    fn open() -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(I2C_PATH)
            .map_err(|source| Error::Open {
                path: I2C_PATH,
                source,
            })?;

        // SAFETY: I2C_SLAVE takes the 7-bit peripheral address as a plain
        // integer argument; the fd stays valid for the life of `file`.
        let rc = unsafe {
            libc::ioctl(
                file.as_raw_fd(),
                I2C_SLAVE,
                libc::c_ulong::from(encoder::BUS_ADDRESS),
            )
        };
        if rc < 0 {
            return Err(Error::ClaimAddress {
                address: encoder::BUS_ADDRESS,
                source: io::Error::last_os_error(),
            });
        }

        Ok(Self { file })
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        let mut data = I2cSmbusData { byte: value };
        let mut args = I2cSmbusIoctlData {
            read_write: I2C_SMBUS_WRITE,
            command: reg,
            size: I2C_SMBUS_BYTE_DATA,
            data: &mut data,
        };

        // SAFETY: `args` and the pointed-to `data` outlive the call; the
        // kernel only reads them for a byte-data write.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), I2C_SMBUS, &mut args) };
        if rc < 0 {
            return Err(Error::RegisterWrite {
                reg,
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }

    fn close(self) -> Result<(), Error> {
        let fd = self.file.into_raw_fd();
        // SAFETY: `into_raw_fd` hands us sole ownership of the descriptor.
        if unsafe { libc::close(fd) } < 0 {
            return Err(Error::Close {
                path: I2C_PATH,
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

/// [`EncoderLink`] over the I2C character device.
pub struct SmbusLink;

impl EncoderLink for SmbusLink {
    type Bus = SmbusSession;

    fn connect(&mut self) -> SmbusSession {
        let device = match SmbusDevice::open() {
            Ok(device) => Some(device),
            Err(err) => {
                error!("{err}");
                None
            }
        };
        SmbusSession { device }
    }
}

/// One bus session. When the device failed to open, the session stays usable
/// and every write reports [`Error::BusUnavailable`] on its own, so the rest
/// of the pass proceeds in degraded form.
pub struct SmbusSession {
    device: Option<SmbusDevice>,
}

impl EncoderBus for SmbusSession {
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        match self.device.as_mut() {
            Some(device) => device.write_register(reg, value),
            None => Err(Error::BusUnavailable),
        }
    }

    fn close(self) -> Result<(), Error> {
        match self.device {
            Some(device) => device.close(),
            None => Ok(()),
        }
    }
}
