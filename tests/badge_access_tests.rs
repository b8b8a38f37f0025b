//! Tests for restricted floor access
//!
//! These tests cover reading badge access, additive grants and every path that
//! must return before approval is requested.

use amzn_access_directory_rust::approval::ScriptedApprovalGate;
use amzn_access_directory_rust::directory::{EmployeeDirectory, FixedClock};
use amzn_access_directory_rust::store::RecordStore;
use amzn_access_directory_rust::types::{Employee, FloorSet, OutcomeKind};
use chrono::NaiveDate;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn setup_with(floors: &str) -> (TempDir, EmployeeDirectory) {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("employees.csv"));
    let clock = Arc::new(FixedClock::at(2025, 3, 14, 9).unwrap());
    let directory = EmployeeDirectory::new(store, clock);

    let mut employee =
        Employee::new("John Doe", "jdoe", NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    employee.badge_access = FloorSet::parse_request(floors);
    directory.store().save_all(&[employee]).unwrap();
    (dir, directory)
}

fn stored_floors(directory: &EmployeeDirectory) -> String {
    directory.find_by_alias("jdoe").unwrap().unwrap().badge_access.to_storage()
}

/// Test the grant example: {3,5} + "3,5,8,2" adds floor 2 only
#[test]
fn test_grant_adds_only_new_valid_floors() {
    let (_dir, directory) = setup_with("3,5");
    let mut gate = ScriptedApprovalGate::approving(1);

    let outcome = directory.grant_badge_access("jdoe", "3,5,8,2", &mut gate);
    assert_eq!(outcome.kind, OutcomeKind::Completed);
    assert_eq!(
        outcome.message,
        "Successfully updated badge access for John Doe (alias: jdoe). Added: Floor 2. Total access now: Floor 2, Floor 3, Floor 5"
    );
    assert_eq!(
        gate.last_request().unwrap().details,
        "Grant John Doe (jdoe) access to: Floor 2. Total access will be: Floor 2, Floor 3, Floor 5"
    );
    assert_eq!(stored_floors(&directory), "2,3,5");
}

/// Test that a grant never removes floors
#[test]
fn test_grant_is_monotonic() {
    let (_dir, directory) = setup_with("4,7");
    let mut gate = ScriptedApprovalGate::approving(1);

    directory.grant_badge_access("jdoe", "2", &mut gate);
    let floors = directory.find_by_alias("jdoe").unwrap().unwrap().badge_access;
    assert!(FloorSet::parse_request("4,7").is_subset(&floors));
    assert_eq!(floors.to_storage(), "2,4,7");
}

/// Test that a covered request reports already-satisfied without asking
#[test]
fn test_grant_already_satisfied_never_asks() {
    let (_dir, directory) = setup_with("3,5");
    let before = fs::read(directory.store().path()).unwrap();
    let mut gate = ScriptedApprovalGate::approving(1);

    let outcome = directory.grant_badge_access("jdoe", "5,3", &mut gate);
    assert_eq!(outcome.kind, OutcomeKind::AlreadySatisfied);
    assert!(outcome.message.contains("Current access: Floor 3, Floor 5"));
    assert_eq!(gate.request_count(), 0);
    assert_eq!(fs::read(directory.store().path()).unwrap(), before);
}

/// Test that requests without a single valid floor are input errors
#[test]
fn test_grant_invalid_floors_never_asks() {
    let (_dir, directory) = setup_with("3");
    let mut gate = ScriptedApprovalGate::approving(3);

    for request in ["1", "0,8,9", "lobby", ""] {
        let outcome = directory.grant_badge_access("jdoe", request, &mut gate);
        assert_eq!(outcome.kind, OutcomeKind::InvalidInput, "request {:?}", request);
        assert!(outcome.message.contains("between 2 and 7"));
    }
    assert_eq!(gate.request_count(), 0);
    assert_eq!(stored_floors(&directory), "3");
}

/// Test that unknown aliases are reported before the gate
#[test]
fn test_grant_unknown_alias() {
    let (_dir, directory) = setup_with("");
    let mut gate = ScriptedApprovalGate::approving(1);

    let outcome = directory.grant_badge_access("ghost", "2", &mut gate);
    assert_eq!(outcome.kind, OutcomeKind::NotFound);
    assert_eq!(gate.request_count(), 0);
}

/// Test that a denied grant keeps the stored floors
#[test]
fn test_grant_denied() {
    let (_dir, directory) = setup_with("3");
    let mut gate = ScriptedApprovalGate::denying();

    let outcome = directory.grant_badge_access("jdoe", "2,6", &mut gate);
    assert_eq!(outcome.kind, OutcomeKind::Cancelled);
    assert_eq!(gate.request_count(), 1);
    assert_eq!(stored_floors(&directory), "3");
}

/// Test reading access with and without restricted floors; the alias is echoed as given
#[test]
fn test_check_badge_access_messages() {
    let (_dir, directory) = setup_with("");
    let outcome = directory.check_badge_access("JDOE");
    assert_eq!(outcome.kind, OutcomeKind::Found);
    assert_eq!(
        outcome.message,
        "Employee John Doe (alias: JDOE) currently has no restricted access (floors 2-7). Note: Floor 1 is publicly accessible to everyone."
    );

    let (_dir, directory) = setup_with("6,2");
    let outcome = directory.check_badge_access("jdoe");
    assert_eq!(
        outcome.message,
        "Employee John Doe (alias: jdoe) has badge access to: Floor 2, Floor 6. Note: Floor 1 is publicly accessible to everyone."
    );

    assert_eq!(directory.check_badge_access("nobody").kind, OutcomeKind::NotFound);
}

/// Test that stored cells written by older tooling are read leniently
#[test]
fn test_legacy_badge_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("employees.csv");
    fs::write(
        &path,
        "name,alias,date_accessed,badge_access\n\
         John Doe,jdoe,2025-01-02,nan\n\
         Ada Smith,asmith,2025-01-03,\"3.0,1,9,5\"\n",
    )
    .unwrap();
    let clock = Arc::new(FixedClock::at(2025, 3, 14, 9).unwrap());
    let directory = EmployeeDirectory::new(RecordStore::new(&path), clock);

    assert!(directory.check_badge_access("jdoe").message.contains("no restricted access"));
    let ada = directory.find_by_alias("asmith").unwrap().unwrap();
    assert_eq!(ada.badge_access.to_storage(), "3,5");
}
