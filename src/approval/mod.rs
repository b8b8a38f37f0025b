//! Human approval for state-changing operations
//!
//! Every operation that would persist a change asks an [`ApprovalGate`] first. The
//! decision point lives in the directories; the mechanism lives behind the trait so
//! it can be an interactive console, a scripted test double or a remote service.
//!
//! # Usage Example
//!
//! ```rust
//! use amzn_access_directory_rust::approval::*;
//! use std::io::Cursor;
//!
//! let mut gate = ConsoleApprovalGate::new(
//!     Passkey::new("1234"),
//!     Cursor::new(b"1234\n".to_vec()),
//!     Vec::new(),
//! );
//! let request = ApprovalRequest::new("Add Employee", "Add employee 'Jane Doe' with alias 'jdoe'");
//! assert_eq!(gate.request(&request), ApprovalDecision::Approved);
//! ```

pub mod gate;

// Re-export all public types for convenience
pub use gate::*;
