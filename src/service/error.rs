//! Error types and handling
//!
//! This module contains the errors that can stop the access directory from
//! starting or from dispatching a request. Policy results are never errors; they
//! are reported as [`OperationOutcome`](crate::directory::OperationOutcome)s.

use crate::store::StoreError;
use crate::types::{ConfigError, ConfigValidationError};
use thiserror::Error;

/// Errors raised while setting up or dispatching to the access directory
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A collection could not be read or written
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration loaded but is not usable
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ConfigValidationError),

    /// The requested operation name is not known
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A required argument is missing or blank
    #[error("Missing required argument '{argument}' for {operation}")]
    MissingArgument {
        /// Operation being dispatched
        operation: String,
        /// Name of the missing argument
        argument: String,
    },

    /// Arguments could not be interpreted
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Logging could not be initialized
    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

impl ServiceError {
    /// Create a missing argument error
    pub fn missing_argument(operation: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument { operation: operation.into(), argument: argument.into() }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Check if the caller can correct the request and try again
    pub fn is_recoverable(&self) -> bool {
        match self {
            ServiceError::Store(e) => !e.is_corrupt(),
            ServiceError::Config(_) => false,
            ServiceError::Validation(_) => false,
            ServiceError::UnknownOperation(_) => true,
            ServiceError::MissingArgument { .. } => true,
            ServiceError::InvalidArguments(_) => true,
            ServiceError::Logging(_) => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            ServiceError::Store(_) => "Storage",
            ServiceError::Config(_) => "Configuration",
            ServiceError::Validation(_) => "Configuration",
            ServiceError::UnknownOperation(_) => "Dispatch",
            ServiceError::MissingArgument { .. } => "Input",
            ServiceError::InvalidArguments(_) => "Input",
            ServiceError::Logging(_) => "Logging",
        }
    }
}

/// Result type for service setup and dispatch
pub type ServiceResult<T> = Result<T, ServiceError>;
