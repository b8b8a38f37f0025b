//! Operation outcomes
//!
//! Every directory operation returns an [`OperationOutcome`] instead of an error:
//! policy results, input problems and storage failures are all rendered as a
//! message the caller can show verbatim, while the [`OutcomeKind`] keeps them
//! distinguishable.

use crate::types::{Operation, OutcomeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of one directory operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// Classification of the result
    pub kind: OutcomeKind,
    /// Human-readable message
    pub message: String,
    /// Value produced for the caller, such as an assigned alias or parking code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl OperationOutcome {
    /// Create an outcome of the given kind
    pub fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), value: None }
    }

    /// Attach a value produced by the operation
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// A read found the requested record
    pub fn found(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Found, message)
    }

    /// The target record does not exist
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::NotFound, message)
    }

    /// The record already exists
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::AlreadyExists, message)
    }

    /// The requested state already holds
    pub fn already_satisfied(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::AlreadySatisfied, message)
    }

    /// An approved change was persisted
    pub fn completed(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Completed, message)
    }

    /// The operator denied approval
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Cancelled, message)
    }

    /// The arguments were unusable
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::InvalidInput, message)
    }

    /// A required argument was missing or blank
    pub fn missing_argument(operation: Operation, argument: &str) -> Self {
        Self::invalid_input(format!(
            "Missing required argument '{}' for {}",
            argument, operation
        ))
    }

    /// A storage failure prevented the operation
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Error, message)
    }

    /// Check whether the operation wrote anything
    pub fn is_completed(&self) -> bool {
        self.kind == OutcomeKind::Completed
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Reject an operation whose required arguments include a blank value.
///
/// Checked before any lookup or approval request, so a rejected call never writes.
pub(crate) fn require_arguments(
    operation: Operation,
    values: &[&str],
) -> Result<(), OperationOutcome> {
    match operation.first_blank_argument(values) {
        Some(argument) => Err(OperationOutcome::missing_argument(operation, argument)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message_verbatim() {
        let outcome = OperationOutcome::not_found("Guest 'Tony Stark' not found in the guest database.");
        assert_eq!(outcome.to_string(), "Guest 'Tony Stark' not found in the guest database.");
        assert_eq!(outcome.kind, OutcomeKind::NotFound);
    }

    #[test]
    fn test_with_value_and_serialization() {
        let outcome = OperationOutcome::completed("done").with_value("K3Y9QZ");
        assert!(outcome.is_completed());

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "completed");
        assert_eq!(json["value"], "K3Y9QZ");

        let plain = serde_json::to_value(OperationOutcome::cancelled("no")).unwrap();
        assert!(plain.get("value").is_none());
    }

    #[test]
    fn test_require_arguments() {
        assert!(require_arguments(Operation::GenerateParkingCode, &["jdoe"]).is_ok());

        let rejected = require_arguments(Operation::AddGuest, &["Tony", " ", "tstark"]).unwrap_err();
        assert_eq!(rejected.kind, OutcomeKind::InvalidInput);
        assert_eq!(rejected.message, "Missing required argument 'last_name' for add_guest");
    }
}
