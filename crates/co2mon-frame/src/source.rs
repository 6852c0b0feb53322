use std::io::Read;

use co2mon_transport::FeatureReport;
use tracing::debug;

use crate::codec::{RawFrame, FRAME_SIZE, OBFUSCATION_KEY};
use crate::error::{FrameError, Result};
use crate::reader::FrameReader;

/// Size of the feature report that carries the session key.
pub const REPORT_SIZE: usize = FRAME_SIZE + 1;

/// Build the feature report that primes the device: report ID 0 followed by
/// the key.
pub fn feature_report(key: &RawFrame) -> [u8; REPORT_SIZE] {
    let mut report = [0u8; REPORT_SIZE];
    report[1..].copy_from_slice(key);
    report
}

/// A sequential source of raw frames from one device connection.
///
/// `initialize` must be called exactly once, before the first `read_frame`.
/// Errors from either call are fatal to the connection; retrying is up to the
/// caller.
pub trait FrameSource {
    /// Perform the one-time device handshake.
    fn initialize(&mut self) -> Result<()>;

    /// Block until one complete frame is available.
    fn read_frame(&mut self) -> Result<RawFrame>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }

    fn read_frame(&mut self) -> Result<RawFrame> {
        (**self).read_frame()
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }

    fn read_frame(&mut self) -> Result<RawFrame> {
        (**self).read_frame()
    }
}

/// Frame source over a live device handle.
///
/// `initialize` sends [`OBFUSCATION_KEY`] as a feature report; reads are
/// refused until it has succeeded.
#[derive(Debug)]
pub struct DeviceSource<T> {
    reader: FrameReader<T>,
    initialized: bool,
}

impl<T: Read + FeatureReport> DeviceSource<T> {
    pub fn new(device: T) -> Self {
        Self {
            reader: FrameReader::new(device),
            initialized: false,
        }
    }

    /// Whether the session key has been sent.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.reader.frames_read()
    }

    /// Borrow the underlying device.
    pub fn get_ref(&self) -> &T {
        self.reader.get_ref()
    }

    /// Consume the source and return the device.
    pub fn into_inner(self) -> T {
        self.reader.into_inner()
    }
}

impl<T: Read + FeatureReport> FrameSource for DeviceSource<T> {
    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(FrameError::AlreadyInitialized);
        }
        let report = feature_report(&OBFUSCATION_KEY);
        self.reader.get_mut().send_feature_report(&report)?;
        self.initialized = true;
        debug!("sent session key feature report");
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RawFrame> {
        if !self.initialized {
            return Err(FrameError::NotInitialized);
        }
        self.reader.read_frame()
    }
}
