use std::fs::{File, OpenOptions};
use std::io::Read;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::traits::FeatureReport;

mod ioctl {
    use nix::ioctl_readwrite_buf;

    // From linux/hidraw.h: HIDIOCSFEATURE(len) = _IOWR('H', 0x06, len).
    pub(super) const HIDRAW_IOC_MAGIC: u8 = b'H';
    pub(super) const HIDRAW_SET_FEATURE: u8 = 0x06;

    ioctl_readwrite_buf!(
        hidraw_ioc_set_feature,
        HIDRAW_IOC_MAGIC,
        HIDRAW_SET_FEATURE,
        u8
    );
}

/// Configuration for an opened hidraw device.
#[derive(Debug, Clone, Default)]
pub struct DeviceConfig {
    /// Maximum time a single read may wait for a report. `None` blocks forever.
    pub read_timeout: Option<Duration>,
}

/// A Linux hidraw character device (e.g. `/dev/hidraw0`).
///
/// Opened in blocking mode. Each `read` returns at most one input report.
pub struct HidrawDevice {
    file: File,
    path: PathBuf,
    config: DeviceConfig,
}

impl HidrawDevice {
    /// Open a hidraw device with default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, DeviceConfig::default())
    }

    /// Open a hidraw device with explicit configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: DeviceConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| TransportError::Open {
                path: path.clone(),
                source: e,
            })?;
        debug!(?path, read_timeout = ?config.read_timeout, "opened hidraw device");
        Ok(Self { file, path, config })
    }

    #[cfg(test)]
    pub(crate) fn from_file(file: File, path: impl Into<PathBuf>, config: DeviceConfig) -> Self {
        Self {
            file,
            path: path.into(),
            config,
        }
    }

    /// The device node this handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current device configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Update the per-read timeout for subsequent reads.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.config.read_timeout = timeout;
    }

    fn wait_readable(&self, timeout: Duration) -> std::io::Result<()> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

        // SAFETY: `pfd` is a valid, writable pollfd and the count matches (1).
        // The descriptor stays open for the lifetime of `self`.
        let rc = unsafe { libc::poll(&mut pfd, 1, millis) };

        match rc {
            rc if rc < 0 => Err(std::io::Error::last_os_error()),
            0 => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("no report within {timeout:?}"),
            )),
            _ => Ok(()),
        }
    }
}

impl Read for HidrawDevice {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if let Some(timeout) = self.config.read_timeout {
            self.wait_readable(timeout)?;
        }
        self.file.read(buf)
    }
}

impl FeatureReport for HidrawDevice {
    fn send_feature_report(&mut self, report: &[u8]) -> Result<()> {
        // The ioctl is read-write, so the kernel gets its own mutable copy.
        let mut buf = report.to_vec();

        // SAFETY: `buf` is a live, writable slice whose length is encoded in
        // the request, and the descriptor is owned by `self`.
        let sent = unsafe { ioctl::hidraw_ioc_set_feature(self.file.as_raw_fd(), &mut buf) };
        sent.map_err(|errno| TransportError::FeatureReport {
            path: self.path.clone(),
            source: std::io::Error::from(errno),
        })?;
        trace!(path = ?self.path, len = report.len(), "sent feature report");
        Ok(())
    }
}

impl std::fmt::Debug for HidrawDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidrawDevice")
            .field("path", &self.path)
            .field("config", &self.config)
            .finish()
    }
}
