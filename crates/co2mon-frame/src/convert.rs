//! Conversion from raw frame values to physical units.

use crate::codec::Record;
use crate::operation::{Quantity, OP_CO2, OP_HUMIDITY, OP_TEMPERATURE};

/// Convert a raw temperature value (1/16 K) to degrees Celsius.
pub fn temp_to_celsius(value: u16) -> f64 {
    f64::from(value) / 16.0 - 273.15
}

/// Convert a raw humidity value (0.01 %RH) to %RH.
pub fn humidity_to_rh(value: u16) -> f64 {
    f64::from(value) / 100.0
}

/// A decoded frame in physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// CO2 concentration. The raw value already is ppm.
    Co2 { ppm: u16 },
    Temperature { celsius: f64 },
    Humidity { rh: f64 },
    /// Any other operation code, passed through unconverted.
    Unknown { operation: u8, value: u16 },
}

impl Reading {
    pub fn from_record(record: &Record) -> Self {
        match Quantity::from_operation(record.operation) {
            Some(Quantity::Co2) => Reading::Co2 { ppm: record.value },
            Some(Quantity::Temperature) => Reading::Temperature {
                celsius: temp_to_celsius(record.value),
            },
            Some(Quantity::Humidity) => Reading::Humidity {
                rh: humidity_to_rh(record.value),
            },
            None => Reading::Unknown {
                operation: record.operation,
                value: record.value,
            },
        }
    }

    /// The recognized quantity, or `None` for unknown operations.
    pub fn quantity(&self) -> Option<Quantity> {
        match self {
            Reading::Co2 { .. } => Some(Quantity::Co2),
            Reading::Temperature { .. } => Some(Quantity::Temperature),
            Reading::Humidity { .. } => Some(Quantity::Humidity),
            Reading::Unknown { .. } => None,
        }
    }

    /// The operation code this reading came from.
    pub fn operation(&self) -> u8 {
        match self {
            Reading::Co2 { .. } => OP_CO2,
            Reading::Temperature { .. } => OP_TEMPERATURE,
            Reading::Humidity { .. } => OP_HUMIDITY,
            Reading::Unknown { operation, .. } => *operation,
        }
    }

    /// The physical value (raw value for unknown operations).
    pub fn value(&self) -> f64 {
        match *self {
            Reading::Co2 { ppm } => f64::from(ppm),
            Reading::Temperature { celsius } => celsius,
            Reading::Humidity { rh } => rh,
            Reading::Unknown { value, .. } => f64::from(value),
        }
    }
}

impl From<Record> for Reading {
    fn from(record: Record) -> Self {
        Reading::from_record(&record)
    }
}
