//! Employee, guest and parking directories
//!
//! This module holds the access policy. Every mutating operation follows the same
//! two phases:
//!
//! 1. Decide whether a write is needed at all (existence, idempotence and no-op
//!    checks). No approval is involved.
//! 2. If it is, ask the [`ApprovalGate`](crate::approval::ApprovalGate), then write
//!    the whole collection back; otherwise return an already-satisfied outcome.
//!
//! Guest removal and parking code issuance ask for approval before looking at the
//! target, so an approved request may still end in not-found (removal) or issue a
//! code to an alias no directory knows (parking).
//!
//! # Usage Example
//!
//! ```rust
//! use amzn_access_directory_rust::approval::ScriptedApprovalGate;
//! use amzn_access_directory_rust::directory::*;
//! use amzn_access_directory_rust::store::RecordStore;
//! use amzn_access_directory_rust::types::OutcomeKind;
//! use std::sync::Arc;
//!
//! let dir = tempfile::tempdir()?;
//! let clock = Arc::new(FixedClock::at(2025, 9, 3, 14).unwrap());
//! let employees = EmployeeDirectory::new(RecordStore::new(dir.path().join("employees.csv")), clock);
//!
//! let mut gate = ScriptedApprovalGate::approving(1);
//! let outcome = employees.add("Jane Doe", "jdoe", &mut gate);
//! assert_eq!(outcome.kind, OutcomeKind::Completed);
//!
//! // Nothing to grant: no approval requested
//! let outcome = employees.grant_badge_access("jdoe", "1,9", &mut gate);
//! assert_eq!(outcome.kind, OutcomeKind::InvalidInput);
//! assert_eq!(gate.request_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod alias;
pub mod badge;
pub mod clock;
pub mod employee;
pub mod guest;
pub mod outcome;
pub mod parking;

// Re-export all public types for convenience
pub use alias::AliasGenerator;
pub use badge::{BadgeAccessManager, BadgeGrantPlan};
pub use clock::{Clock, FixedClock, SystemClock};
pub use employee::EmployeeDirectory;
pub use guest::{full_name, GuestDirectory};
pub use outcome::OperationOutcome;
pub use parking::{ParkingCodeIssuer, CODE_ALPHABET};
