//! Acquisition loop and latest-reading publishing.
//!
//! This is the "just works" layer. Open a device, send the session key, and
//! run the reader loop on its own thread while anything else reads the
//! latest value per quantity without ever blocking acquisition.

#[cfg(target_os = "linux")]
pub mod connector;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod readings;
pub mod signal;
pub mod sink;

#[cfg(target_os = "linux")]
pub use connector::{connect, connect_with_config};
pub use error::{MonitorError, Result};
pub use metrics::{gauge_name, render_prometheus, NAMESPACE};
pub use monitor::{spawn, Monitor, MonitorHandle};
#[cfg(feature = "async")]
pub use monitor::spawn_blocking;
pub use readings::{Readings, Snapshot};
pub use signal::{Never, StopSignal};
pub use sink::ReadingSink;
