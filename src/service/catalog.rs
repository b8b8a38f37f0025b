//! Operation catalog
//!
//! A serializable description of every named operation, so an external
//! orchestrator can register them as tools without reading this crate.

use crate::types::Operation;
use serde::{Deserialize, Serialize};

/// One operation argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Argument name
    pub name: String,
    /// What the argument holds
    pub description: String,
    /// Whether the argument must be present and non-blank
    pub required: bool,
}

/// One named operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// snake_case name used with `invoke`
    pub name: String,
    /// What the operation does
    pub description: String,
    /// Whether the operation may ask for approval and write
    pub requires_approval: bool,
    /// Arguments in positional order
    pub parameters: Vec<ParameterSpec>,
}

impl OperationSpec {
    /// Describe a single operation
    pub fn for_operation(operation: Operation) -> Self {
        Self {
            name: operation.name().to_string(),
            description: operation_description(operation).to_string(),
            requires_approval: operation.is_mutating(),
            parameters: operation
                .parameters()
                .iter()
                .map(|name| ParameterSpec {
                    name: name.to_string(),
                    description: parameter_description(operation, name).to_string(),
                    required: true,
                })
                .collect(),
        }
    }
}

/// Describe every operation, in catalog order
pub fn catalog() -> Vec<OperationSpec> {
    Operation::ALL.into_iter().map(OperationSpec::for_operation).collect()
}

fn operation_description(operation: Operation) -> &'static str {
    match operation {
        Operation::CheckEmployeeExists => "Check if an employee exists in the employee database by alias.",
        Operation::AddEmployee => {
            "Add a new employee to the database with no badge access. Requires approval."
        }
        Operation::CheckBadgeAccess => {
            "Check which restricted floors (2-7) an employee can access. Floor 1 is public."
        }
        Operation::UpdateBadgeAccess => {
            "Grant additional restricted floors (2-7) to an employee. Existing access is kept. Requires approval."
        }
        Operation::CheckGuestExists => {
            "Check if a guest exists and whether their access has expired (30 days since last access by default)."
        }
        Operation::RemoveExpiredGuest => "Remove a guest from the guest database. Requires approval.",
        Operation::AddGuest => "Register a new guest with a chosen alias. Requires approval.",
        Operation::AddGuestWithAutoAlias => {
            "Register a guest with an alias generated from their name and the current month, day and hour. Requires approval."
        }
        Operation::GenerateParkingCode => {
            "Generate a 6-character parking validation code for an employee. Requires approval."
        }
    }
}

fn parameter_description(operation: Operation, name: &str) -> &'static str {
    match (operation, name) {
        (Operation::AddGuest, "alias") => "Alias to register the guest under",
        (Operation::GenerateParkingCode, "alias") => "Alias of the employee receiving the code",
        (_, "alias") => "Employee alias, matched case-insensitively",
        (_, "name") => "Full name of the employee",
        (_, "floors") => "Comma-separated floor numbers, e.g. \"2,3,5\"",
        (_, "first_name") => "Guest first name",
        (_, "last_name") => "Guest last name",
        _ => "",
    }
}
