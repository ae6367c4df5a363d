//! # Record Store Error Types
//!
//! Every fallible store operation returns [`SeenResult`]. Variants carry a
//! stable error code so callers can react without matching on messages.
//!
//! ## Error Categories
//!
//! - **Validation Errors**: missing names, bad dates, malformed batches
//! - **Data Errors**: log lines that cannot be decoded
//! - **System Errors**: I/O and serialization failures

use std::path::PathBuf;
use thiserror::Error;

/// Error categories for coarse-grained handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied invalid input
    Validation,
    /// Stored data could not be decoded
    Data,
    /// I/O or serialization failure
    System,
}

/// Result type for all record store operations.
pub type SeenResult<T> = Result<T, SeenError>;

#[derive(Debug, Error)]
pub enum SeenError {
    /// E_MALFORMED_RECORD - A log line is not a valid record
    ///
    /// Produced while decoding the log. `read` drops such lines instead of
    /// surfacing the error.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number inside the log file
        line: usize,
        /// Why decoding failed
        reason: String,
    },

    /// E_MISSING_FIELD - A required field is absent or empty
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// E_INVALID_BATCH - Batch input is not well-formed structured data
    #[error("Invalid batch input: {reason}")]
    InvalidBatch {
        /// Parser or shape error
        reason: String,
    },

    /// E_INVALID_DATE - A date is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// E_IO - I/O operation failed
    #[error("I/O error in {operation}: {source}")]
    Io {
        /// Operation that was being performed
        operation: String,
        /// Path involved in the operation (if applicable)
        path: Option<PathBuf>,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// E_SERIALIZATION - Encoding a record failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SeenError {
    /// Builds an I/O error with an optional path and an operation name.
    pub fn io<P, S>(path: P, operation: S, source: std::io::Error) -> Self
    where
        P: Into<Option<PathBuf>>,
        S: Into<String>,
    {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    pub fn invalid_batch(reason: impl Into<String>) -> Self {
        Self::InvalidBatch {
            reason: reason.into(),
        }
    }

    /// Returns the stable error code for this variant.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedRecord { .. } => "E_MALFORMED_RECORD",
            Self::MissingField { .. } => "E_MISSING_FIELD",
            Self::InvalidBatch { .. } => "E_INVALID_BATCH",
            Self::InvalidDate { .. } => "E_INVALID_DATE",
            Self::Io { .. } => "E_IO",
            Self::Serialization(_) => "E_SERIALIZATION",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingField { .. } | Self::InvalidBatch { .. } | Self::InvalidDate { .. } => {
                ErrorCategory::Validation
            }
            Self::MalformedRecord { .. } => ErrorCategory::Data,
            Self::Io { .. } | Self::Serialization(_) => ErrorCategory::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_categories() {
        let err = SeenError::MissingField { field: "name" };
        assert_eq!(err.error_code(), "E_MISSING_FIELD");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.to_string(), "Missing required field 'name'");

        let err = SeenError::io(
            PathBuf::from("/tmp/x"),
            "open log",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.error_code(), "E_IO");
        assert_eq!(err.category(), ErrorCategory::System);
        assert!(err.to_string().contains("open log"));
    }
}
