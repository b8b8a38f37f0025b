//! Tests for guest lookup, expiration, removal and registration
//!
//! The clock is fixed at 2025-09-03 14:00 so expiration ages and generated alias
//! suffixes are deterministic.

use amzn_access_directory_rust::approval::ScriptedApprovalGate;
use amzn_access_directory_rust::directory::{FixedClock, GuestDirectory};
use amzn_access_directory_rust::store::RecordStore;
use amzn_access_directory_rust::types::{Guest, OutcomeKind};
use chrono::{Duration, NaiveDate};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 3).unwrap()
}

fn setup(guests: &[(&str, &str, i64)]) -> (TempDir, GuestDirectory) {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("guests.csv"));
    let clock = Arc::new(FixedClock::at(2025, 9, 3, 14).unwrap());
    let directory = GuestDirectory::new(store, clock);

    if !guests.is_empty() {
        let records: Vec<Guest> = guests
            .iter()
            .map(|(name, alias, days_ago)| Guest::new(*name, *alias, today() - Duration::days(*days_ago)))
            .collect();
        directory.store().save_all(&records).unwrap();
    }
    (dir, directory)
}

/// Test the expired-guest lifecycle: check, remove, re-register with a generated alias
#[test]
fn test_expired_guest_reregistration_flow() {
    let (_dir, directory) = setup(&[("Tony Stark", "tstark", 45)]);
    let mut gate = ScriptedApprovalGate::approving(2);

    let check = directory.check_exists("Tony", "Stark");
    assert_eq!(check.kind, OutcomeKind::Expired);
    assert!(check.message.contains("45 days ago"));
    assert!(check.message.contains("expired after 30 days"));

    let removed = directory.remove("Tony", "Stark", &mut gate);
    assert_eq!(removed.kind, OutcomeKind::Completed);
    assert_eq!(gate.last_request().unwrap().operation, "Remove Expired Guest");
    assert!(directory.store().load().unwrap().is_empty());

    let added = directory.add_with_auto_alias("Tony", "Stark", &mut gate);
    assert_eq!(added.kind, OutcomeKind::Completed);
    assert_eq!(added.value.as_deref(), Some("tstark090314"));
    assert_eq!(
        gate.last_request().unwrap().details,
        "Re-register guest 'Tony Stark' with auto-generated alias 'tstark090314'"
    );

    let guests = directory.store().load().unwrap();
    assert_eq!(guests, vec![Guest::new("Tony Stark", "tstark090314", today())]);
    assert_eq!(directory.check_exists("tony", "stark").kind, OutcomeKind::Active);
}

/// Test the 30-day boundary: exactly 30 days is still active
#[test]
fn test_expiration_boundary() {
    let (_dir, directory) = setup(&[("Pepper Potts", "ppotts", 30), ("Happy Hogan", "hhogan", 31)]);

    let active = directory.check_exists("Pepper", "Potts");
    assert_eq!(active.kind, OutcomeKind::Active);
    assert_eq!(
        active.message,
        "Guest found: Pepper Potts (alias: ppotts, last accessed: 2025-08-04, 30 days ago)"
    );
    assert_eq!(directory.check_exists("Happy", "Hogan").kind, OutcomeKind::Expired);
}

/// Test lookup of an unknown guest and of a missing collection
#[test]
fn test_check_guest_not_found() {
    let (_dir, directory) = setup(&[]);
    let outcome = directory.check_exists("Bruce", "Banner");
    assert_eq!(outcome.kind, OutcomeKind::NotFound);
    assert_eq!(outcome.message, "Guest 'Bruce Banner' not found in the guest database.");
}

/// Test removal of a guest that is not present after approval
#[test]
fn test_remove_missing_guest_after_approval() {
    let (_dir, directory) = setup(&[("Tony Stark", "tstark", 45)]);
    let before = fs::read(directory.store().path()).unwrap();
    let mut gate = ScriptedApprovalGate::approving(1);

    let outcome = directory.remove("Bruce", "Banner", &mut gate);
    assert_eq!(outcome.kind, OutcomeKind::NotFound);
    assert_eq!(outcome.message, "Guest 'Bruce Banner' not found in the database.");
    assert_eq!(gate.request_count(), 1);
    assert_eq!(fs::read(directory.store().path()).unwrap(), before);
}

/// Test that a denied removal keeps the guest
#[test]
fn test_remove_denied() {
    let (_dir, directory) = setup(&[("Tony Stark", "tstark", 45)]);
    let mut gate = ScriptedApprovalGate::denying();

    let outcome = directory.remove("Tony", "Stark", &mut gate);
    assert_eq!(outcome.kind, OutcomeKind::Cancelled);
    assert_eq!(directory.store().load().unwrap().len(), 1);
}

/// Test that removal drops every row with the matching name
#[test]
fn test_remove_deletes_all_matching_rows() {
    let (_dir, directory) = setup(&[
        ("Tony Stark", "tstark", 45),
        ("Pepper Potts", "ppotts", 2),
        ("TONY STARK", "tstark2", 60),
    ]);
    let mut gate = ScriptedApprovalGate::approving(1);

    assert_eq!(directory.remove("tony", "stark", &mut gate).kind, OutcomeKind::Completed);
    let guests = directory.store().load().unwrap();
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0].alias, "ppotts");
}

/// Test registration with a caller-supplied alias
#[test]
fn test_add_guest_with_alias() {
    let (_dir, directory) = setup(&[]);
    let mut gate = ScriptedApprovalGate::approving(1);

    let outcome = directory.add("Bruce", "Banner", "bbanner", &mut gate);
    assert_eq!(outcome.kind, OutcomeKind::Completed);
    assert_eq!(
        outcome.message,
        "Successfully added guest: Bruce Banner (alias: bbanner, date: 2025-09-03)"
    );
    assert_eq!(
        gate.last_request().unwrap().details,
        "Add guest 'Bruce Banner' with alias 'bbanner' to the database"
    );
    assert!(directory.find_by_name("bruce banner").unwrap().is_some());
}

/// Test that an existing guest (even an expired one) blocks registration
#[test]
fn test_add_existing_guest_never_asks() {
    let (_dir, directory) = setup(&[("Tony Stark", "tstark", 45)]);
    let mut gate = ScriptedApprovalGate::approving(2);

    assert_eq!(directory.add("Tony", "Stark", "ts", &mut gate).kind, OutcomeKind::AlreadyExists);
    assert_eq!(
        directory.add_with_auto_alias("Tony", "Stark", &mut gate).kind,
        OutcomeKind::AlreadyExists
    );
    assert_eq!(gate.request_count(), 0);
}

/// Test that generated aliases skip every alias already in use
#[test]
fn test_auto_alias_disambiguation() {
    let (_dir, directory) = setup(&[
        ("Tina Stark", "tstark090314", 1),
        ("Tom Stark", "TSTARK0903141", 1),
    ]);
    let mut gate = ScriptedApprovalGate::approving(1);

    let outcome = directory.add_with_auto_alias("Tony", "Stark", &mut gate);
    assert_eq!(outcome.value.as_deref(), Some("tstark0903142"));
    assert!(outcome.message.contains("new auto-generated alias: tstark0903142"));
}

/// Test that a denied auto-alias registration writes nothing
#[test]
fn test_auto_alias_denied() {
    let (_dir, directory) = setup(&[]);
    let mut gate = ScriptedApprovalGate::denying();

    let outcome = directory.add_with_auto_alias("Tony", "Stark", &mut gate);
    assert_eq!(outcome.kind, OutcomeKind::Cancelled);
    assert!(outcome.value.is_none());
    assert!(!directory.store().exists());
}
