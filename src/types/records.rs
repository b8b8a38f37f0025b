//! Persisted record types for the access directory
//!
//! This module contains the employee, guest and parking record rows together with
//! the badge floor set that employees carry.

use crate::store::{Record, RowView, StoreError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Floor constants for the building badge system
pub mod floors {
    /// Floor that is publicly accessible without a badge
    pub const PUBLIC_FLOOR: u8 = 1;

    /// Lowest floor that requires badge access
    pub const MIN_BADGE_FLOOR: u8 = 2;

    /// Highest floor that requires badge access
    pub const MAX_BADGE_FLOOR: u8 = 7;
}

/// Date format used for every stored date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check whether a floor number can be granted through badge access
pub fn is_badge_floor(floor: u32) -> bool {
    (u32::from(floors::MIN_BADGE_FLOOR)..=u32::from(floors::MAX_BADGE_FLOOR)).contains(&floor)
}

/// Numerically ordered set of restricted floors (2-7) an employee may badge into
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSet(BTreeSet<u8>);

impl FloorSet {
    /// Create an empty floor set
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse a comma-separated floor request.
    ///
    /// Tokens that are not plain decimal numbers, or that fall outside the badge
    /// range, are ignored entirely. The result may therefore be empty.
    pub fn parse_request(floors_csv: &str) -> Self {
        Self(floors_csv.split(',').filter_map(parse_badge_floor).collect())
    }

    /// Decode a stored `badge_access` cell.
    ///
    /// Returns the decoded set together with every token that had to be dropped
    /// because it was not a valid badge floor.
    pub fn from_stored(cell: &str) -> (Self, Vec<String>) {
        let trimmed = cell.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return (Self::new(), Vec::new());
        }

        let mut set = BTreeSet::new();
        let mut dropped = Vec::new();
        for token in trimmed.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            // Older tooling wrote floats such as "3.0"
            let token = token.strip_suffix(".0").unwrap_or(token);
            match parse_badge_floor(token) {
                Some(floor) => {
                    set.insert(floor);
                }
                None => dropped.push(token.to_string()),
            }
        }
        (Self(set), dropped)
    }

    /// Render the set the way it is stored: comma-joined, sorted, empty when none
    pub fn to_storage(&self) -> String {
        self.0.iter().map(u8::to_string).collect::<Vec<_>>().join(",")
    }

    /// Render the set for people, e.g. `Floor 2, Floor 5`
    pub fn describe(&self) -> String {
        self.0.iter().map(|f| format!("Floor {}", f)).collect::<Vec<_>>().join(", ")
    }

    /// Floors in `self` that are not already in `existing`
    pub fn difference(&self, existing: &FloorSet) -> FloorSet {
        Self(self.0.difference(&existing.0).copied().collect())
    }

    /// Union of both sets
    pub fn union(&self, other: &FloorSet) -> FloorSet {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// Check whether every floor in `self` is also in `other`
    pub fn is_subset(&self, other: &FloorSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Check whether a floor is in the set
    pub fn contains(&self, floor: u8) -> bool {
        self.0.contains(&floor)
    }

    /// Iterate over the floors in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of floors in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<u8> for FloorSet {
    /// Collect floors, silently discarding anything outside the badge range
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|f| is_badge_floor(u32::from(*f))).collect())
    }
}

impl fmt::Display for FloorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_storage())
    }
}

fn parse_badge_floor(token: &str) -> Option<u8> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let floor: u32 = token.parse().ok()?;
    if is_badge_floor(floor) {
        u8::try_from(floor).ok()
    } else {
        None
    }
}

fn parse_date(row: &RowView<'_>, column: &str) -> Result<NaiveDate, StoreError> {
    let value = row.get(column)?.trim();
    // Tolerate a trailing time component such as "2025-01-15 00:00:00"
    let date_part = value.split_whitespace().next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| StoreError::InvalidDate {
        line: row.line(),
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// An employee allowed into the facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Full name
    pub name: String,
    /// Case-insensitive identity handle
    pub alias: String,
    /// Last date the employee was registered or accessed
    pub date_accessed: NaiveDate,
    /// Restricted floors the employee may badge into
    pub badge_access: FloorSet,
}

impl Employee {
    /// Create a new employee with no restricted floor access
    pub fn new(name: impl Into<String>, alias: impl Into<String>, date_accessed: NaiveDate) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            date_accessed,
            badge_access: FloorSet::new(),
        }
    }
}

impl Record for Employee {
    const KIND: &'static str = "employee";
    const COLUMNS: &'static [&'static str] = &["name", "alias", "date_accessed", "badge_access"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.alias.clone(),
            self.date_accessed.format(DATE_FORMAT).to_string(),
            self.badge_access.to_storage(),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self, StoreError> {
        let (badge_access, dropped) = FloorSet::from_stored(row.get_or_empty("badge_access"));
        if !dropped.is_empty() {
            warn!(
                line = row.line(),
                dropped = ?dropped,
                "Ignoring stored badge floors outside the restricted range"
            );
        }
        Ok(Self {
            name: row.get("name")?.to_string(),
            alias: row.get("alias")?.to_string(),
            date_accessed: parse_date(row, "date_accessed")?,
            badge_access,
        })
    }
}

/// A guest allowed into the facility for a limited period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    /// Full name, `"{first} {last}"`
    pub name: String,
    /// Guest alias
    pub alias: String,
    /// Date the guest was registered or last accessed
    pub date_accessed: NaiveDate,
}

impl Guest {
    /// Create a new guest record
    pub fn new(name: impl Into<String>, alias: impl Into<String>, date_accessed: NaiveDate) -> Self {
        Self { name: name.into(), alias: alias.into(), date_accessed }
    }

    /// Whole calendar days between the last access and `today`
    pub fn days_since_access(&self, today: NaiveDate) -> i64 {
        (today - self.date_accessed).num_days()
    }

    /// A guest is expired when more than `expiration_days` have passed
    pub fn is_expired(&self, today: NaiveDate, expiration_days: i64) -> bool {
        self.days_since_access(today) > expiration_days
    }
}

impl Record for Guest {
    const KIND: &'static str = "guest";
    const COLUMNS: &'static [&'static str] = &["name", "alias", "date_accessed"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.alias.clone(),
            self.date_accessed.format(DATE_FORMAT).to_string(),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self, StoreError> {
        Ok(Self {
            name: row.get("name")?.to_string(),
            alias: row.get("alias")?.to_string(),
            date_accessed: parse_date(row, "date_accessed")?,
        })
    }
}

/// An issued parking validation code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingRecord {
    /// Alias the code was issued to
    pub alias: String,
    /// The validation code
    pub parking_code: String,
    /// Date of issuance
    pub date_issued: NaiveDate,
}

impl Record for ParkingRecord {
    const KIND: &'static str = "parking record";
    const COLUMNS: &'static [&'static str] = &["alias", "parking_code", "date_issued"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.alias.clone(),
            self.parking_code.clone(),
            self.date_issued.format(DATE_FORMAT).to_string(),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self, StoreError> {
        Ok(Self {
            alias: row.get("alias")?.to_string(),
            parking_code: row.get("parking_code")?.to_string(),
            date_issued: parse_date(row, "date_issued")?,
        })
    }
}
