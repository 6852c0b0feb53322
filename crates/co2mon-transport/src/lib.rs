//! Raw device access for USB CO2 monitors.
//!
//! This is the lowest layer of co2mon. It knows how to open a hidraw
//! character device, send a HID feature report and perform blocking report
//! reads. It knows nothing about the report contents; see `co2mon-frame`.

pub mod error;
pub mod traits;

#[cfg(target_os = "linux")]
pub mod hidraw;

pub use error::{Result, TransportError};
pub use traits::FeatureReport;

#[cfg(target_os = "linux")]
pub use hidraw::{DeviceConfig, HidrawDevice};
