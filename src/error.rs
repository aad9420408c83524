//! Table engine error definitions

use crate::types::ArrayType;
use std::error::Error;
use thiserror::Error;

/// Table engine error types
///
/// Represents every failure the engine reports. All of them are returned
/// synchronously from the call that caused them and none are retried.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Lookup or replace referencing an absent row or column key
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    /// Replacement or insertion of a key that must be novel but already exists
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    /// Fill percent outside (0,1] or otherwise malformed configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    /// Typed access to a column of a different element kind
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: ArrayType,
        actual: ArrayType,
    },
    /// Column length disagrees with the row count
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// Ordinal beyond the end of an index or array
    #[error("Ordinal {ordinal} out of bounds for length {len}")]
    OutOfBounds { ordinal: usize, len: usize },
    /// Failure raised by an external table source
    #[error("Source read error: {0}")]
    SourceRead(#[source] Box<dyn Error + Send + Sync>),
    /// Failure raised by an external table sink
    #[error("Sink write error: {0}")]
    SinkWrite(#[source] Box<dyn Error + Send + Sync>),
    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration document could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl FrameError {
    /// Key not found error for any debuggable key
    pub fn key_not_found<K: std::fmt::Debug + ?Sized>(key: &K) -> Self {
        FrameError::KeyNotFound(format!("{:?}", key))
    }

    /// Duplicate key error for any debuggable key
    pub fn duplicate_key<K: std::fmt::Debug + ?Sized>(key: &K) -> Self {
        FrameError::DuplicateKey(format!("{:?}", key))
    }

    /// Wraps an external reader failure
    pub fn source_read<E: Into<Box<dyn Error + Send + Sync>>>(err: E) -> Self {
        FrameError::SourceRead(err.into())
    }

    /// Wraps an external writer failure
    pub fn sink_write<E: Into<Box<dyn Error + Send + Sync>>>(err: E) -> Self {
        FrameError::SinkWrite(err.into())
    }
}

/// Result type for table engine operations
pub type FrameResult<T> = Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_error_display() {
        let err = FrameError::key_not_found("r1");
        assert_eq!(err.to_string(), "Key not found: \"r1\"");

        let err = FrameError::duplicate_key(&7);
        assert_eq!(err.to_string(), "Duplicate key: 7");

        let err = FrameError::TypeMismatch {
            expected: ArrayType::Double,
            actual: ArrayType::Boolean,
        };
        assert_eq!(err.to_string(), "Type mismatch: expected DOUBLE, got BOOLEAN");
    }

    #[test]
    fn test_frame_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FrameError = io_err.into();
        assert!(matches!(err, FrameError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_frame_error_wraps_source() {
        let err = FrameError::source_read("connection reset");
        assert_eq!(err.to_string(), "Source read error: connection reset");
        assert!(err.source().is_some());
    }
}
