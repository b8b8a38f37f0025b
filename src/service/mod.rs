//! Named-operation surface
//!
//! This module ties the directories to a configuration and exposes them by
//! operation name, together with the operation catalog, logging setup and the
//! errors that can stop the service from starting.
//!
//! # Usage Example
//!
//! ```rust
//! use amzn_access_directory_rust::approval::StaticApprovalGate;
//! use amzn_access_directory_rust::service::AccessDirectory;
//! use amzn_access_directory_rust::types::{DirectoryConfig, OutcomeKind};
//! use std::collections::BTreeMap;
//!
//! let dir = tempfile::tempdir()?;
//! let config = DirectoryConfig::new(dir.path(), "1234");
//! let mut directory = AccessDirectory::open(config, StaticApprovalGate::approve_all())?;
//!
//! let mut args = BTreeMap::new();
//! args.insert("alias".to_string(), "jdoe".to_string());
//! let outcome = directory.invoke("check_employee_exists", &args);
//! assert_eq!(outcome.kind, OutcomeKind::NotFound);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod logging;

// Re-export all public types for convenience
pub use catalog::{catalog, OperationSpec, ParameterSpec};
pub use dispatcher::{json_arguments, parse_key_value_args, resolve, AccessDirectory};
pub use error::{ServiceError, ServiceResult};
pub use logging::LoggingConfig;
