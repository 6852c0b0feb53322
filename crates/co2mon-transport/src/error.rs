use std::path::PathBuf;

/// Errors that can occur while talking to the raw device.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device node.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The feature report carrying the session key was rejected.
    #[error("feature report to {path} failed: {source}")]
    FeatureReport {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the device handle.
    #[error("device I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The underlying I/O error kind.
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            TransportError::Open { source, .. } | TransportError::FeatureReport { source, .. } => {
                source.kind()
            }
            TransportError::Io(err) => err.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
