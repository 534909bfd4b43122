//! Error types for the service crate.

use arules_miner::MinerError;

#[cfg(feature = "persistence")]
use std::path::PathBuf;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur during persistence or service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Mining or database construction error.
    #[error("mining error: {0}")]
    Miner(#[from] MinerError),

    /// Malformed transaction or rule text.
    #[error("format error: {0}")]
    Format(#[from] arules::FormatError),

    /// I/O error during persistence operations.
    #[cfg(feature = "persistence")]
    #[error("I/O error at {path}: {source}")]
    IoError {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid file format during load.
    #[cfg(feature = "persistence")]
    #[error("invalid file format: {message}")]
    InvalidFormat {
        /// What was wrong.
        message: String,
    },

    /// Serialization error.
    #[cfg(feature = "persistence")]
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error.
    #[cfg(feature = "persistence")]
    #[error("deserialization error: {0}")]
    DeserializationError(String),

    /// Payload checksum does not match the stored one.
    #[cfg(feature = "persistence")]
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Stored checksum (hex).
        expected: String,
        /// Checksum of the payload read (hex).
        actual: String,
    },
}

impl ServiceError {
    /// Creates an I/O error with path context.
    #[cfg(feature = "persistence")]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid format error.
    #[cfg(feature = "persistence")]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
