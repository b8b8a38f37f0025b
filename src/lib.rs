//! Access Directory
//!
//! An approval-gated directory of employees, guests and parking validation codes,
//! backed by plain tabular files.
//!
//! # Overview
//!
//! Callers ask whether a person is known, what restricted floors they may enter and
//! whether a guest's access is still valid. They can also register people, extend
//! badge access, remove guests and issue parking codes. Every operation that would
//! persist a change first asks a human operator for approval through an
//! [`ApprovalGate`]; a denial leaves every collection untouched.
//!
//! ## Key Features
//!
//! - **Employee directory**: Lookup by alias and registration with no badge access
//! - **Badge access**: Floors 2-7 granted additively; floor 1 is public
//! - **Guest directory**: 30-day expiration and generated aliases for re-registration
//! - **Parking codes**: Random 6-character `A-Z0-9` codes in an append-only log
//! - **Approval gate**: Console passkey prompt, scripted and static gates for tests
//! - **Named operations**: Dispatch by name with string or JSON arguments
//!
//! ## Quick Start
//!
//! ```rust
//! use amzn_access_directory_rust::*;
//!
//! let dir = tempfile::tempdir()?;
//! let config = DirectoryConfig::new(dir.path(), "1234");
//! let mut directory = AccessDirectory::open(config, ScriptedApprovalGate::approving(2))?;
//!
//! let outcome = directory.add_employee("Jane Doe", "jdoe");
//! assert_eq!(outcome.kind, OutcomeKind::Completed);
//!
//! let outcome = directory.update_badge_access("jdoe", "3,5");
//! assert_eq!(outcome.kind, OutcomeKind::Completed);
//!
//! let outcome = directory.check_badge_access("jdoe");
//! assert!(outcome.message.contains("Floor 3, Floor 5"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Records, floor sets, operation and outcome enums, configuration
//! - [`approval`]: The approval gate and its implementations
//! - [`store`]: Whole-file persistence of record collections
//! - [`directory`]: Employee, badge, guest and parking policy
//! - [`service`]: Named-operation dispatcher, catalog, logging and errors
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Service   │    │  Directory  │    │    Store    │
//! │             │    │             │    │             │
//! │ Dispatcher  │───►│ Employees   │───►│ RecordStore │
//! │ Catalog     │    │ Guests      │    │ Row codec   │
//! │ Logging     │    │ Parking     │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                            │                   ▲
//!                            ▼                   │
//!                    ┌─────────────┐    ┌─────────────┐
//!                    │  Approval   │    │    Types    │
//!                    │             │    │             │
//!                    │ Gate        │    │ Records     │
//!                    │ Passkey     │    │ Config      │
//!                    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod approval;
pub mod directory;
pub mod service;
pub mod store;
pub mod types;

// Core types and configuration
pub use types::{
    ConfigError, ConfigValidationError, DirectoryConfig, Employee, FloorSet, Guest, Operation,
    OutcomeKind, ParkingRecord,
};

// Approval
pub use approval::{
    ApprovalDecision, ApprovalGate, ApprovalRequest, ConsoleApprovalGate, Passkey,
    ScriptedApprovalGate, StaticApprovalGate,
};

// Storage
pub use store::{RecordStore, StoreError};

// Directories
pub use directory::{
    AliasGenerator, BadgeAccessManager, Clock, EmployeeDirectory, FixedClock, GuestDirectory,
    OperationOutcome, ParkingCodeIssuer, SystemClock,
};

// Service
pub use service::{catalog, AccessDirectory, LoggingConfig, ServiceError};
