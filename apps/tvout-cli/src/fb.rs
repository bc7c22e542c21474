//! Framebuffer-side display routing.
//!
//! The JZ47xx framebuffer driver exposes one custom ioctl that flips the
//! display controller between the internal SLCD and the TV encoder; its
//! argument is the [`TvStandard`] code.

use std::{
    fs::{File, OpenOptions},
    io,
    os::fd::{AsRawFd, IntoRawFd},
};

use tracing::error;
use tvout_core::{DisplayRoute, Error, TvStandard};

/// Framebuffer device node.
pub const FB_PATH: &str = "/dev/fb0";

/// Driver-private TV-out routing request (`'F' << 8 | 0xf0`).
const FBIO_TVOUT: libc::c_ulong = 0x46f0;

/// An open framebuffer device.
struct FbDevice {
    file: File,
}

impl FbDevice {
    fn open() -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(FB_PATH)
            .map_err(|source| Error::Open {
                path: FB_PATH,
                source,
            })?;
        Ok(Self { file })
    }

    fn select(&mut self, target: TvStandard) -> Result<(), Error> {
        // SAFETY: integer-argument ioctl on an fd we own; the driver copies
        // the value, nothing is borrowed past the call.
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                FBIO_TVOUT,
                target.code() as libc::c_int,
            )
        };
        if rc < 0 {
            return Err(Error::RouteSelect {
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
                path: FB_PATH,
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

/// [`DisplayRoute`] over the framebuffer device.
///
/// An open failure is reported here but is deliberately not fatal: the
/// routing attempt still happens and fails with
/// [`Error::DisplayUnavailable`], which in turn keeps the encoder powered
/// down. This mirrors the tool's long-standing behavior on devices without
/// the TV-out capable driver.
pub struct FbRoute {
    device: Option<FbDevice>,
}

impl FbRoute {
    pub fn open() -> Self {
        let device = match FbDevice::open() {
            Ok(device) => Some(device),
            Err(err) => {
                error!("{err}");
                None
            }
        };
        Self { device }
    }

    pub fn close(self) -> Result<(), Error> {
        match self.device {
            Some(device) => device.close(),
            None => Ok(()),
        }
    }
}

impl DisplayRoute for FbRoute {
    fn select(&mut self, target: TvStandard) -> Result<(), Error> {
        match self.device.as_mut() {
            Some(device) => device.select(target),
            None => Err(Error::DisplayUnavailable),
        }
    }
}
