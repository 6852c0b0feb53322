use std::sync::atomic::{AtomicU64, Ordering};

use co2mon_frame::{Quantity, Reading};
use serde::Serialize;

use crate::sink::ReadingSink;

/// One last-value-wins cell. The value is stored as f64 bits so a single
/// atomic store publishes it.
#[derive(Debug)]
struct Slot {
    bits: AtomicU64,
    updates: AtomicU64,
}

impl Slot {
    const fn new() -> Self {
        Self {
            bits: AtomicU64::new(0),
            updates: AtomicU64::new(0),
        }
    }

    fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
        self.updates.fetch_add(1, Ordering::Release);
    }

    fn load(&self) -> Option<f64> {
        if self.updates.load(Ordering::Acquire) == 0 {
            return None;
        }
        Some(f64::from_bits(self.bits.load(Ordering::Acquire)))
    }
}

/// Latest reading per quantity, shared between the acquisition loop and
/// any number of readers.
///
/// Publishing and reading are lock-free. Only the most recent value is kept.
#[derive(Debug)]
pub struct Readings {
    co2: Slot,
    temperature: Slot,
    humidity: Slot,
    frames: AtomicU64,
    unknown: AtomicU64,
}

impl Default for Readings {
    fn default() -> Self {
        Self::new()
    }
}

impl Readings {
    pub const fn new() -> Self {
        Self {
            co2: Slot::new(),
            temperature: Slot::new(),
            humidity: Slot::new(),
            frames: AtomicU64::new(0),
            unknown: AtomicU64::new(0),
        }
    }

    fn slot(&self, quantity: Quantity) -> &Slot {
        match quantity {
            Quantity::Co2 => &self.co2,
            Quantity::Temperature => &self.temperature,
            Quantity::Humidity => &self.humidity,
        }
    }

    /// Record one reading.
    pub fn record(&self, reading: &Reading) {
        self.frames.fetch_add(1, Ordering::Relaxed);
        match reading.quantity() {
            Some(quantity) => self.slot(quantity).store(reading.value()),
            None => {
                self.unknown.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Latest value for a quantity, `None` until the first reading arrives.
    pub fn latest(&self, quantity: Quantity) -> Option<f64> {
        self.slot(quantity).load()
    }

    /// How many times a quantity has been published.
    pub fn updates(&self, quantity: Quantity) -> u64 {
        self.slot(quantity).updates.load(Ordering::Acquire)
    }

    /// Frames recorded, recognized or not.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Frames carrying an unrecognized operation code.
    pub fn unknown_operations(&self) -> u64 {
        self.unknown.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every slot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            co2_ppm: self.latest(Quantity::Co2),
            temperature_celsius: self.latest(Quantity::Temperature),
            humidity_rh: self.latest(Quantity::Humidity),
            frames: self.frames(),
            unknown_operations: self.unknown_operations(),
        }
    }
}

impl ReadingSink for Readings {
    fn publish(&self, reading: &Reading) {
        self.record(reading);
    }
}

/// Serializable copy of [`Readings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub co2_ppm: Option<f64>,
    pub temperature_celsius: Option<f64>,
    pub humidity_rh: Option<f64>,
    pub frames: u64,
    pub unknown_operations: u64,
}

impl Snapshot {
    pub fn get(&self, quantity: Quantity) -> Option<f64> {
        match quantity {
            Quantity::Co2 => self.co2_ppm,
            Quantity::Temperature => self.temperature_celsius,
            Quantity::Humidity => self.humidity_rh,
        }
    }
}
