//! Tabular record persistence
//!
//! This module provides the whole-collection load/rewrite primitive used by every
//! directory in the crate.
//!
//! # Overview
//!
//! - **RecordStore**: Loads a full collection and atomically rewrites it
//! - **Record**: Row schema implemented by each persisted type
//! - **Codec**: CSV encoding with a header line and quoted fields
//!
//! There is no in-place row update. Mutation is always load, transform in memory,
//! save the whole collection. Two processes writing the same file concurrently will
//! lose updates (last writer wins); the store assumes a single writer.
//!
//! # Usage Example
//!
//! ```rust
//! use amzn_access_directory_rust::store::RecordStore;
//! use amzn_access_directory_rust::types::Guest;
//! use chrono::NaiveDate;
//!
//! let dir = tempfile::tempdir()?;
//! let store: RecordStore<Guest> = RecordStore::new(dir.path().join("guests.csv"));
//!
//! // A collection that was never written loads as empty
//! assert!(store.load()?.is_empty());
//!
//! let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
//! store.save_all(&[Guest::new("Tony Stark", "tstark", date)])?;
//! assert_eq!(store.load()?.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod error;
pub mod record_store;

// Re-export all public types for convenience
pub use codec::{Record, RowView};
pub use error::StoreError;
pub use record_store::{key_matches, RecordStore};
