/// Errors that can occur in the acquisition loop.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] co2mon_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] co2mon_frame::FrameError),

    /// The acquisition thread could not be started.
    #[error("failed to spawn acquisition thread: {0}")]
    Spawn(std::io::Error),

    /// The acquisition thread panicked.
    #[error("acquisition thread panicked")]
    Panicked,

    /// Metrics could not be registered or encoded.
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl MonitorError {
    /// True if the error is a clean end-of-stream at a frame boundary.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(
            self,
            MonitorError::Frame(co2mon_frame::FrameError::ConnectionClosed { received: 0 })
        )
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
