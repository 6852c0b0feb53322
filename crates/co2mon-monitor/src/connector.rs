use std::path::Path;

use co2mon_frame::{DeviceSource, FrameSource};
use co2mon_transport::{DeviceConfig, HidrawDevice};
use tracing::info;

use crate::error::Result;

/// Open a hidraw device and send the session key.
pub fn connect(path: impl AsRef<Path>) -> Result<DeviceSource<HidrawDevice>> {
    connect_with_config(path, DeviceConfig::default())
}

/// Open with explicit configuration and send the session key.
pub fn connect_with_config(
    path: impl AsRef<Path>,
    config: DeviceConfig,
) -> Result<DeviceSource<HidrawDevice>> {
    let device = HidrawDevice::open_with_config(path, config)?;
    let path = device.path().to_path_buf();

    let mut source = DeviceSource::new(device);
    source.initialize()?;
    info!(?path, "co2 monitor initialized");
    Ok(source)
}
