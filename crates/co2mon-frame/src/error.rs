use std::fmt;

use crate::codec::RawFrame;

/// Errors that can occur while acquiring or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame failed validation both as sent and after reversing the
    /// obfuscation. Carries the transformed bytes.
    #[error("checksum error: {}", Hex(.bytes))]
    Checksum { bytes: RawFrame },

    /// An I/O error occurred while reading frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device handle reported end-of-file.
    #[error("connection closed ({received} of 8 frame bytes received)")]
    ConnectionClosed { received: usize },

    /// The device rejected the session-key handshake.
    #[error("device transport error: {0}")]
    Transport(#[from] co2mon_transport::TransportError),

    /// A frame was requested before the session key was sent.
    #[error("frame source not initialized")]
    NotInitialized,

    /// The session key was already sent on this connection.
    #[error("frame source already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, FrameError>;

struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
