//! Prometheus text exposition of a [`Snapshot`].

use co2mon_frame::Quantity;
use prometheus::{Encoder, Gauge, IntCounter, Opts, Registry, TextEncoder};

use crate::error::Result;
use crate::readings::Snapshot;

/// Metric namespace, shared with existing CO2 monitor dashboards.
pub const NAMESPACE: &str = "co2monitor";

/// Gauge name (without namespace) and help text for a quantity.
pub fn gauge_name(quantity: Quantity) -> (&'static str, &'static str) {
    match quantity {
        Quantity::Co2 => ("co2_ppm", "CO2 concentration in parts per million."),
        Quantity::Temperature => ("temp_celsius", "Ambient temperature in degrees Celsius."),
        Quantity::Humidity => ("humidity_rh", "Relative humidity in percent."),
    }
}

/// Build a registry holding the values of `snapshot`.
///
/// Gauges that were never published are not registered, so they are absent
/// from the exposition rather than reported as 0.
pub fn registry(snapshot: &Snapshot) -> Result<Registry> {
    let registry = Registry::new();

    for quantity in Quantity::ALL {
        let Some(value) = snapshot.get(quantity) else {
            continue;
        };
        let (name, help) = gauge_name(quantity);
        let gauge = Gauge::with_opts(Opts::new(name, help).namespace(NAMESPACE))?;
        gauge.set(value);
        registry.register(Box::new(gauge))?;
    }

    let frames = IntCounter::with_opts(
        Opts::new("frames_total", "Frames decoded from the device.").namespace(NAMESPACE),
    )?;
    frames.inc_by(snapshot.frames);
    registry.register(Box::new(frames))?;

    let unknown = IntCounter::with_opts(
        Opts::new(
            "unknown_operations_total",
            "Frames carrying an unrecognized operation code.",
        )
        .namespace(NAMESPACE),
    )?;
    unknown.inc_by(snapshot.unknown_operations);
    registry.register(Box::new(unknown))?;

    Ok(registry)
}

/// Render a snapshot in the Prometheus text format.
pub fn render_prometheus(snapshot: &Snapshot) -> Result<String> {
    let families = registry(snapshot)?.gather();
    let mut buf = Vec::new();
    TextEncoder::new().encode(&families, &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()).into())
}
