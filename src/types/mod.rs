//! Core types for the access directory
//!
//! This module contains the persisted record types, the operation and outcome
//! enumerations, and the configuration structures used throughout the crate.
//!
//! # Overview
//!
//! - **Records**: Employees, guests and parking records, plus badge floor sets
//! - **Enums**: Named operations and outcome classification
//! - **Configuration**: Directory configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use amzn_access_directory_rust::types::*;
//!
//! // Requested floors outside 2-7 and non-numeric tokens are ignored
//! let requested = FloorSet::parse_request("3,5,8,2");
//! assert_eq!(requested.to_storage(), "2,3,5");
//!
//! // Operations are addressed by name
//! let op: Operation = "update_badge_access".parse().unwrap();
//! assert_eq!(op.parameters(), &["alias", "floors"]);
//!
//! // Configure the directory
//! let config = DirectoryConfig {
//!     approval_passkey: "1234".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod records;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use records::*;
