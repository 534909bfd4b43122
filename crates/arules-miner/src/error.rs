//! Error types for rule mining.

use thiserror::Error;

/// Errors that can occur while building a database or mining rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MinerError {
    /// A run parameter is outside its domain.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Minimum or extraction requested on an empty ordered multiset.
    ///
    /// The engine's loop guards make this unreachable; seeing it means a
    /// logic defect, not a user error.
    #[error("empty collection: {0}")]
    EmptyCollection(&'static str),

    /// The supplied vertical database violates its construction contract.
    #[error("inconsistent database: {0}")]
    InconsistentDatabase(String),

    /// Error reading the transaction text format.
    #[error("format error: {0}")]
    Format(#[from] arules::FormatError),
}

impl MinerError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for miner operations.
pub type MinerResult<T> = std::result::Result<T, MinerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_parameter() {
        let err = MinerError::invalid_parameter("k", "must be greater than 0");
        assert_eq!(err.to_string(), "invalid parameter k: must be greater than 0");
    }

    #[test]
    fn test_error_display_empty_collection() {
        let err = MinerError::EmptyCollection("pop_maximum");
        assert_eq!(err.to_string(), "empty collection: pop_maximum");
    }

    #[test]
    fn test_error_display_inconsistent_database() {
        let err = MinerError::InconsistentDatabase("support[3] = 2 but tids[3] has 1".to_string());
        assert_eq!(
            err.to_string(),
            "inconsistent database: support[3] = 2 but tids[3] has 1"
        );
    }

    #[test]
    fn test_error_from_format_error() {
        let err: MinerError = arules::FormatError::EmptyInput.into();
        assert!(matches!(err, MinerError::Format(_)));
    }
}
