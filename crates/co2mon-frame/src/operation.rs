//! Operation codes carried in byte 0 of a frame.
//!
//! The device reports many more codes than the three below. Unknown codes are
//! valid frames and must be passed through, not rejected.

use serde::Serialize;

/// CO2 concentration in ppm ('P').
pub const OP_CO2: u8 = b'P';

/// Ambient temperature in 1/16 K ('B').
pub const OP_TEMPERATURE: u8 = b'B';

/// Relative humidity in 0.01 %RH ('A').
pub const OP_HUMIDITY: u8 = b'A';

/// Returns a human-readable name for an operation code.
pub fn operation_name(operation: u8) -> &'static str {
    match operation {
        OP_CO2 => "CO2",
        OP_TEMPERATURE => "TEMPERATURE",
        OP_HUMIDITY => "HUMIDITY",
        _ => "UNKNOWN",
    }
}

/// A physical quantity this crate knows how to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Co2,
    Temperature,
    Humidity,
}

impl Quantity {
    /// All recognized quantities, in publishing order.
    pub const ALL: [Quantity; 3] = [Quantity::Co2, Quantity::Temperature, Quantity::Humidity];

    /// Map an operation code to its quantity, if recognized.
    pub fn from_operation(operation: u8) -> Option<Self> {
        match operation {
            OP_CO2 => Some(Quantity::Co2),
            OP_TEMPERATURE => Some(Quantity::Temperature),
            OP_HUMIDITY => Some(Quantity::Humidity),
            _ => None,
        }
    }

    /// The operation code that carries this quantity.
    pub fn operation(self) -> u8 {
        match self {
            Quantity::Co2 => OP_CO2,
            Quantity::Temperature => OP_TEMPERATURE,
            Quantity::Humidity => OP_HUMIDITY,
        }
    }

    /// Unit of the converted value.
    pub fn unit(self) -> &'static str {
        match self {
            Quantity::Co2 => "ppm",
            Quantity::Temperature => "celsius",
            Quantity::Humidity => "rh",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quantity::Co2 => "co2",
            Quantity::Temperature => "temperature",
            Quantity::Humidity => "humidity",
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
