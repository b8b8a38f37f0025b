//! Enumeration types for the access directory
//!
//! This module contains the named operations exposed to callers and the outcome
//! classification every operation reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named operations callers can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Look up an employee by alias
    CheckEmployeeExists,
    /// Register a new employee
    AddEmployee,
    /// Show which restricted floors an employee may enter
    CheckBadgeAccess,
    /// Grant additional restricted floors to an employee
    UpdateBadgeAccess,
    /// Look up a guest by first and last name, with expiration
    CheckGuestExists,
    /// Remove a guest (typically an expired one)
    RemoveExpiredGuest,
    /// Register a new guest with a caller-supplied alias
    AddGuest,
    /// Register a new guest with a generated alias
    AddGuestWithAutoAlias,
    /// Issue a parking validation code
    GenerateParkingCode,
}

impl Operation {
    /// Every operation, in catalog order
    pub const ALL: [Operation; 9] = [
        Operation::CheckEmployeeExists,
        Operation::AddEmployee,
        Operation::CheckBadgeAccess,
        Operation::UpdateBadgeAccess,
        Operation::CheckGuestExists,
        Operation::RemoveExpiredGuest,
        Operation::AddGuest,
        Operation::AddGuestWithAutoAlias,
        Operation::GenerateParkingCode,
    ];

    /// The snake_case name callers use
    pub fn name(self) -> &'static str {
        match self {
            Operation::CheckEmployeeExists => "check_employee_exists",
            Operation::AddEmployee => "add_employee",
            Operation::CheckBadgeAccess => "check_badge_access",
            Operation::UpdateBadgeAccess => "update_badge_access",
            Operation::CheckGuestExists => "check_guest_exists",
            Operation::RemoveExpiredGuest => "remove_expired_guest",
            Operation::AddGuest => "add_guest",
            Operation::AddGuestWithAutoAlias => "add_guest_with_auto_alias",
            Operation::GenerateParkingCode => "generate_parking_code",
        }
    }

    /// Names of the required string arguments
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Operation::CheckEmployeeExists
            | Operation::CheckBadgeAccess
            | Operation::GenerateParkingCode => &["alias"],
            Operation::AddEmployee => &["name", "alias"],
            Operation::UpdateBadgeAccess => &["alias", "floors"],
            Operation::CheckGuestExists
            | Operation::RemoveExpiredGuest
            | Operation::AddGuestWithAutoAlias => &["first_name", "last_name"],
            Operation::AddGuest => &["first_name", "last_name", "alias"],
        }
    }

    /// The first required argument whose value is blank.
    ///
    /// `values` are given in [`parameters`](Self::parameters) order.
    pub fn first_blank_argument(self, values: &[&str]) -> Option<&'static str> {
        self.parameters()
            .iter()
            .enumerate()
            .find(|(i, _)| values.get(*i).map_or(true, |v| v.trim().is_empty()))
            .map(|(_, parameter)| *parameter)
    }

    /// Whether the operation may persist a change (and therefore may ask for approval)
    pub fn is_mutating(self) -> bool {
        !matches!(
            self,
            Operation::CheckEmployeeExists | Operation::CheckBadgeAccess | Operation::CheckGuestExists
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == normalized)
            .ok_or_else(|| format!("Unknown operation: {}", s))
    }
}

/// Classification of an operation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// A read found the requested record
    Found,
    /// A guest lookup found a non-expired guest
    Active,
    /// A guest lookup found an expired guest
    Expired,
    /// The target record does not exist
    NotFound,
    /// A record with the same identity already exists; nothing written
    AlreadyExists,
    /// The requested state already holds; nothing written
    AlreadySatisfied,
    /// An approved change was persisted
    Completed,
    /// The operator denied approval; nothing written
    Cancelled,
    /// The arguments were unusable; nothing written
    InvalidInput,
    /// A storage failure prevented the operation
    Error,
}

impl OutcomeKind {
    /// Genuine failures, as opposed to normal policy results
    pub fn is_error(self) -> bool {
        matches!(self, OutcomeKind::Error)
    }

    /// Normal negative or no-op results of the access policy
    pub fn is_policy_outcome(self) -> bool {
        matches!(
            self,
            OutcomeKind::NotFound
                | OutcomeKind::AlreadyExists
                | OutcomeKind::AlreadySatisfied
                | OutcomeKind::Cancelled
        )
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeKind::Found => "found",
            OutcomeKind::Active => "active",
            OutcomeKind::Expired => "expired",
            OutcomeKind::NotFound => "not_found",
            OutcomeKind::AlreadyExists => "already_exists",
            OutcomeKind::AlreadySatisfied => "already_satisfied",
            OutcomeKind::Completed => "completed",
            OutcomeKind::Cancelled => "cancelled",
            OutcomeKind::InvalidInput => "invalid_input",
            OutcomeKind::Error => "error",
        };
        write!(f, "{}", label)
    }
}
