//! Frame decoding for the report protocol of low-cost USB CO2 monitors.
//!
//! This is the core of co2mon. Every report the device sends is an 8-byte
//! frame:
//! - byte 0: operation code (which quantity the frame carries)
//! - bytes 1-2: big-endian raw value
//! - byte 3: checksum (sum of bytes 0-2, mod 256)
//! - bytes 4-7: trailer `0d 00 00 00`
//!
//! Most firmware scrambles frames with a fixed permutation, XOR, rotate and
//! subtract pipeline; some emits them in the clear. [`decode`] accepts both.

pub mod codec;
pub mod convert;
pub mod error;
pub mod operation;
pub mod reader;
pub mod source;

pub use codec::{
    check, decode, decrypt, obfuscate, plaintext, Encoding, RawFrame, Record, CIPHER_STATE,
    FRAME_SIZE, OBFUSCATION_KEY, SHUFFLE, TRAILER,
};
pub use convert::{humidity_to_rh, temp_to_celsius, Reading};
pub use error::{FrameError, Result};
pub use operation::{operation_name, Quantity, OP_CO2, OP_HUMIDITY, OP_TEMPERATURE};
pub use reader::FrameReader;
pub use source::{feature_report, DeviceSource, FrameSource, REPORT_SIZE};
