//! Guest directory
//!
//! This module contains the GuestDirectory struct. Guests are identified by their
//! full name and expire once more than the configured number of days (30 by default)
//! have passed since their last access. Expired guests are removed and registered
//! again under a new alias; a record is never renewed in place.

use crate::approval::{ApprovalGate, ApprovalRequest};
use crate::directory::employee::storage_failure;
use crate::directory::outcome::require_arguments;
use crate::directory::{AliasGenerator, Clock, OperationOutcome};
use crate::store::{key_matches, RecordStore, StoreError};
use crate::types::{defaults, Guest, Operation, OutcomeKind, DATE_FORMAT};
use std::sync::Arc;
use tracing::{info, instrument};

/// Join first and last name the way guest records store them
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

/// Identity lookup with expiration, removal and registration for guests
#[derive(Debug, Clone)]
pub struct GuestDirectory {
    store: RecordStore<Guest>,
    clock: Arc<dyn Clock>,
    aliases: AliasGenerator,
    expiration_days: i64,
}

impl GuestDirectory {
    /// Create a directory over a guest collection with the default expiration window
    pub fn new(store: RecordStore<Guest>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            aliases: AliasGenerator::new(),
            expiration_days: defaults::GUEST_EXPIRATION_DAYS,
        }
    }

    /// Override the expiration window
    pub fn with_expiration_days(mut self, days: i64) -> Self {
        self.expiration_days = days;
        self
    }

    /// The backing collection
    pub fn store(&self) -> &RecordStore<Guest> {
        &self.store
    }

    /// Days after the last access at which a guest expires
    pub fn expiration_days(&self) -> i64 {
        self.expiration_days
    }

    /// Find a guest by full name, case-insensitively
    pub fn find_by_name(&self, name: &str) -> Result<Option<Guest>, StoreError> {
        self.store.find_by(name, |g| g.name.as_str())
    }

    /// Look up a guest and classify them as active or expired. Read-only.
    #[instrument(skip(self))]
    pub fn check_exists(&self, first_name: &str, last_name: &str) -> OperationOutcome {
        if let Err(outcome) =
            require_arguments(Operation::CheckGuestExists, &[first_name, last_name])
        {
            return outcome;
        }
        let name = full_name(first_name, last_name);
        let guest = match self.find_by_name(&name) {
            Ok(Some(guest)) => guest,
            Ok(None) => {
                return OperationOutcome::not_found(format!(
                    "Guest '{}' not found in the guest database.",
                    name
                ));
            }
            Err(e) => return storage_failure("Error checking guest database", &e),
        };

        let today = self.clock.today();
        let days = guest.days_since_access(today);
        if guest.is_expired(today, self.expiration_days) {
            OperationOutcome::new(
                OutcomeKind::Expired,
                format!(
                    "Guest found but EXPIRED: {} (alias: {}, last accessed: {}, {} days ago). Guest access has expired after {} days and must be re-registered with a new alias.",
                    guest.name,
                    guest.alias,
                    guest.date_accessed.format(DATE_FORMAT),
                    days,
                    self.expiration_days
                ),
            )
            .with_value(guest.alias)
        } else {
            OperationOutcome::new(
                OutcomeKind::Active,
                format!(
                    "Guest found: {} (alias: {}, last accessed: {}, {} days ago)",
                    guest.name,
                    guest.alias,
                    guest.date_accessed.format(DATE_FORMAT),
                    days
                ),
            )
            .with_value(guest.alias)
        }
    }

    /// Remove every guest whose full name matches.
    ///
    /// Approval is requested before the guest is looked up, so an approved request
    /// for an unknown guest still consumes the approval and reports not-found.
    #[instrument(skip(self, gate))]
    pub fn remove(
        &self,
        first_name: &str,
        last_name: &str,
        gate: &mut dyn ApprovalGate,
    ) -> OperationOutcome {
        if let Err(outcome) =
            require_arguments(Operation::RemoveExpiredGuest, &[first_name, last_name])
        {
            return outcome;
        }
        let name = full_name(first_name, last_name);

        let request = ApprovalRequest::new(
            "Remove Expired Guest",
            format!("Remove guest '{}' from the guest database", name),
        );
        if !gate.request(&request).is_approved() {
            return OperationOutcome::cancelled(format!(
                "Operation cancelled: Removal of guest '{}' was not approved.",
                name
            ));
        }

        let mut guests = match self.store.load() {
            Ok(guests) => guests,
            Err(e) => return storage_failure("Error removing expired guest", &e),
        };

        let before = guests.len();
        guests.retain(|g| !key_matches(&g.name, &name));
        if guests.len() == before {
            return OperationOutcome::not_found(format!(
                "Guest '{}' not found in the database.",
                name
            ));
        }

        if let Err(e) = self.store.save_all(&guests) {
            return storage_failure("Error removing expired guest", &e);
        }

        info!(request_id = %request.id, removed = before - guests.len(), "Guest removed");
        OperationOutcome::completed(format!(
            "Expired guest '{}' has been removed from the database. They can now be re-registered with a new alias.",
            name
        ))
    }

    /// Register a new guest under a caller-supplied alias
    #[instrument(skip(self, gate))]
    pub fn add(
        &self,
        first_name: &str,
        last_name: &str,
        alias: &str,
        gate: &mut dyn ApprovalGate,
    ) -> OperationOutcome {
        if let Err(outcome) =
            require_arguments(Operation::AddGuest, &[first_name, last_name, alias])
        {
            return outcome;
        }
        let name = full_name(first_name, last_name);
        let mut guests = match self.store.load() {
            Ok(guests) => guests,
            Err(e) => return storage_failure("Error adding guest", &e),
        };

        if guests.iter().any(|g| key_matches(&g.name, &name)) {
            return OperationOutcome::already_exists(format!(
                "Guest '{}' already exists in the database.",
                name
            ));
        }

        let request = ApprovalRequest::new(
            "Add Guest",
            format!("Add guest '{}' with alias '{}' to the database", name, alias),
        );
        if !gate.request(&request).is_approved() {
            return OperationOutcome::cancelled(format!(
                "Operation cancelled: Adding guest '{}' was not approved.",
                name
            ));
        }

        let today = self.clock.today();
        guests.push(Guest::new(name.clone(), alias, today));
        if let Err(e) = self.store.save_all(&guests) {
            return storage_failure("Error adding guest", &e);
        }

        info!(request_id = %request.id, alias, "Guest added");
        OperationOutcome::completed(format!(
            "Successfully added guest: {} (alias: {}, date: {})",
            name,
            alias,
            today.format(DATE_FORMAT)
        ))
        .with_value(alias)
    }

    /// Register a new guest under a generated alias.
    ///
    /// The alias is the first initial and last name plus a month/day/hour suffix,
    /// disambiguated with an increasing counter against every existing guest alias.
    /// The assigned alias is returned as the outcome value.
    #[instrument(skip(self, gate))]
    pub fn add_with_auto_alias(
        &self,
        first_name: &str,
        last_name: &str,
        gate: &mut dyn ApprovalGate,
    ) -> OperationOutcome {
        if let Err(outcome) =
            require_arguments(Operation::AddGuestWithAutoAlias, &[first_name, last_name])
        {
            return outcome;
        }
        let name = full_name(first_name, last_name);
        let mut guests = match self.store.load() {
            Ok(guests) => guests,
            Err(e) => return storage_failure("Error adding guest with auto alias", &e),
        };

        if guests.iter().any(|g| key_matches(&g.name, &name)) {
            return OperationOutcome::already_exists(format!(
                "Guest '{}' already exists in the database.",
                name
            ));
        }

        let now = self.clock.now();
        let Some(alias) = self.aliases.generate(
            first_name,
            last_name,
            now,
            guests.iter().map(|g| g.alias.as_str()),
        ) else {
            return OperationOutcome::invalid_input(
                "A first name is required to generate a guest alias.",
            );
        };

        let request = ApprovalRequest::new(
            "Re-register Expired Guest",
            format!("Re-register guest '{}' with auto-generated alias '{}'", name, alias),
        );
        if !gate.request(&request).is_approved() {
            return OperationOutcome::cancelled(format!(
                "Operation cancelled: Re-registering guest '{}' was not approved.",
                name
            ));
        }

        let today = now.date();
        guests.push(Guest::new(name.clone(), alias.clone(), today));
        if let Err(e) = self.store.save_all(&guests) {
            return storage_failure("Error adding guest with auto alias", &e);
        }

        info!(request_id = %request.id, alias = %alias, "Guest registered with generated alias");
        OperationOutcome::completed(format!(
            "Successfully re-registered guest: {} with new auto-generated alias: {} (date: {})",
            name,
            alias,
            today.format(DATE_FORMAT)
        ))
        .with_value(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::ScriptedApprovalGate;
    use crate::directory::FixedClock;
    use chrono::Duration;
    use tempfile::TempDir;

    fn directory() -> (TempDir, GuestDirectory) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("guests.csv"));
        let clock = Arc::new(FixedClock::at(2025, 9, 3, 14).unwrap());
        (dir, GuestDirectory::new(store, clock))
    }

    fn seed_guest(directory: &GuestDirectory, name: &str, alias: &str, days_ago: i64) {
        let today = directory.clock.today();
        let mut guests = directory.store().load().unwrap();
        guests.push(Guest::new(name, alias, today - Duration::days(days_ago)));
        directory.store().save_all(&guests).unwrap();
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Tony", "Stark"), "Tony Stark");
    }

    #[test]
    fn test_check_exists_boundary() {
        let (_dir, directory) = directory();
        seed_guest(&directory, "Thirty Days", "tdays", 30);
        seed_guest(&directory, "Thirtyone Days", "odays", 31);

        let active = directory.check_exists("thirty", "days");
        assert_eq!(active.kind, OutcomeKind::Active);
        assert!(active.message.contains("30 days ago"));

        let expired = directory.check_exists("Thirtyone", "Days");
        assert_eq!(expired.kind, OutcomeKind::Expired);
        assert!(expired.message.contains("31 days ago"));
        assert!(expired.message.contains("must be re-registered with a new alias"));
        assert_eq!(expired.value.as_deref(), Some("odays"));
    }

    #[test]
    fn test_custom_expiration_window() {
        let (_dir, directory) = directory();
        let directory = directory.with_expiration_days(7);
        seed_guest(&directory, "Week Old", "wold", 8);
        assert_eq!(directory.check_exists("Week", "Old").kind, OutcomeKind::Expired);
        assert_eq!(directory.expiration_days(), 7);
    }

    #[test]
    fn test_remove_asks_before_lookup() {
        let (_dir, directory) = directory();
        let mut gate = ScriptedApprovalGate::approving(1);

        let outcome = directory.remove("Nobody", "Here", &mut gate);
        assert_eq!(outcome.kind, OutcomeKind::NotFound);
        assert_eq!(gate.request_count(), 1);
        assert!(!directory.store().exists());
    }

    #[test]
    fn test_add_existing_skips_gate() {
        let (_dir, directory) = directory();
        seed_guest(&directory, "Tony Stark", "tstark", 2);
        let mut gate = ScriptedApprovalGate::approving(2);

        assert_eq!(directory.add("tony", "stark", "ts2", &mut gate).kind, OutcomeKind::AlreadyExists);
        assert_eq!(
            directory.add_with_auto_alias("Tony", "Stark", &mut gate).kind,
            OutcomeKind::AlreadyExists
        );
        assert_eq!(gate.request_count(), 0);
    }

    #[test]
    fn test_add_with_auto_alias_rejects_empty_first_name() {
        let (_dir, directory) = directory();
        let mut gate = ScriptedApprovalGate::approving(1);
        let outcome = directory.add_with_auto_alias("", "Stark", &mut gate);
        assert_eq!(outcome.kind, OutcomeKind::InvalidInput);
        assert_eq!(gate.request_count(), 0);
    }
}
