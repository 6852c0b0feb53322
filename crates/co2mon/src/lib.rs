//! Reader for low-cost USB CO2/temperature/humidity monitors.
//!
//! These devices (sold as CO2Mini, AIRCO2NTROL MINI/COACH and similar) speak
//! an obfuscated 8-byte report protocol over raw HID.
//!
//! # Crate Structure
//!
//! - [`transport`] — Raw hidraw device access
//! - [`frame`] — Frame unscrambling, validation and value conversion
//! - [`monitor`] — Acquisition loop and latest-reading publishing

/// Re-export transport types.
pub mod transport {
    pub use co2mon_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use co2mon_frame::*;
}

/// Re-export monitor types.
pub mod monitor {
    pub use co2mon_monitor::*;
}
