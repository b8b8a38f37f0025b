//! Storage error types
//!
//! This module contains the errors that can occur while loading or rewriting a
//! persisted collection.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a record collection
#[derive(Debug, Error)]
pub enum StoreError {
    /// The collection could not be read or written
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path of the collection
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The first line names none of the expected columns
    #[error("{kind} collection has no header line")]
    MissingHeader {
        /// Record kind, e.g. "employee"
        kind: &'static str,
    },

    /// A required column is absent from the header
    #[error("missing column '{column}' in {kind} collection")]
    MissingColumn {
        /// Record kind, e.g. "employee"
        kind: &'static str,
        /// Name of the missing column
        column: String,
    },

    /// A row could not be tokenized
    #[error("malformed row at line {line}: {detail}")]
    MalformedRow {
        /// Line number (1-based) where the row starts
        line: usize,
        /// Description of the problem
        detail: String,
    },

    /// A date cell is not `YYYY-MM-DD`
    #[error("invalid date '{value}' in column '{column}' at line {line}")]
    InvalidDate {
        /// Line number (1-based) where the row starts
        line: usize,
        /// Column holding the date
        column: String,
        /// Raw cell value
        value: String,
    },

    /// The temporary file could not be moved over the collection
    #[error("failed to replace {path}: {source}")]
    Persist {
        /// Path of the collection
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create an I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Check whether the persisted data itself is unreadable (as opposed to the
    /// file system failing)
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            StoreError::MissingHeader { .. }
                | StoreError::MissingColumn { .. }
                | StoreError::MalformedRow { .. }
                | StoreError::InvalidDate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_classification() {
        let corrupt = StoreError::MalformedRow { line: 3, detail: "unterminated quote".into() };
        assert!(corrupt.is_corrupt());

        let io = StoreError::io(
            "employees.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_corrupt());
        assert!(io.to_string().contains("employees.csv"));
    }

    #[test]
    fn test_missing_column_message() {
        let error = StoreError::MissingColumn { kind: "guest", column: "alias".into() };
        assert_eq!(error.to_string(), "missing column 'alias' in guest collection");
    }
}
