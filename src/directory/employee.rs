//! Employee directory
//!
//! This module contains the EmployeeDirectory struct which looks up and registers
//! employees. Badge floor management lives in the `badge` module.

use crate::approval::{ApprovalGate, ApprovalRequest};
use crate::directory::outcome::require_arguments;
use crate::directory::{Clock, OperationOutcome};
use crate::store::{key_matches, RecordStore, StoreError};
use crate::types::{Employee, Operation, DATE_FORMAT};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Identity lookup, creation and badge-floor management for employees
#[derive(Debug, Clone)]
pub struct EmployeeDirectory {
    pub(crate) store: RecordStore<Employee>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl EmployeeDirectory {
    /// Create a directory over an employee collection
    pub fn new(store: RecordStore<Employee>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The backing collection
    pub fn store(&self) -> &RecordStore<Employee> {
        &self.store
    }

    /// Find an employee by alias, case-insensitively
    pub fn find_by_alias(&self, alias: &str) -> Result<Option<Employee>, StoreError> {
        self.store.find_by(alias, |e| e.alias.as_str())
    }

    /// Look up an employee by alias. Read-only.
    #[instrument(skip(self))]
    pub fn check_exists(&self, alias: &str) -> OperationOutcome {
        if let Err(outcome) = require_arguments(Operation::CheckEmployeeExists, &[alias]) {
            return outcome;
        }
        match self.find_by_alias(alias) {
            Ok(Some(employee)) => OperationOutcome::found(format!(
                "Employee found: {} (alias: {}, last accessed: {})",
                employee.name,
                employee.alias,
                employee.date_accessed.format(DATE_FORMAT)
            )),
            Ok(None) => OperationOutcome::not_found(format!(
                "Employee with alias '{}' not found in the employee database.",
                alias
            )),
            Err(e) => storage_failure("Error checking employee database", &e),
        }
    }

    /// Register a new employee with today's date and no badge access.
    ///
    /// An employee with the same name (case-insensitive) short-circuits before
    /// approval is requested.
    #[instrument(skip(self, gate))]
    pub fn add(&self, name: &str, alias: &str, gate: &mut dyn ApprovalGate) -> OperationOutcome {
        if let Err(outcome) = require_arguments(Operation::AddEmployee, &[name, alias]) {
            return outcome;
        }
        let mut employees = match self.store.load() {
            Ok(employees) => employees,
            Err(e) => return storage_failure("Error adding employee", &e),
        };

        if employees.iter().any(|e| key_matches(&e.name, name)) {
            return OperationOutcome::already_exists(format!(
                "Employee '{}' already exists in the database.",
                name
            ));
        }

        let request = ApprovalRequest::new(
            "Add Employee",
            format!("Add employee '{}' with alias '{}' to the database", name, alias),
        );
        if !gate.request(&request).is_approved() {
            return OperationOutcome::cancelled(format!(
                "Operation cancelled: Adding employee '{}' was not approved.",
                name
            ));
        }

        let today = self.clock.today();
        employees.push(Employee::new(name, alias, today));
        if let Err(e) = self.store.save_all(&employees) {
            return storage_failure("Error adding employee", &e);
        }

        info!(request_id = %request.id, alias, "Employee added");
        OperationOutcome::completed(format!(
            "Successfully added employee: {} (alias: {}, date: {}). No badge access granted yet.",
            name,
            alias,
            today.format(DATE_FORMAT)
        ))
    }
}

/// Convert a storage failure into an outcome the caller can show verbatim
pub(crate) fn storage_failure(context: &str, e: &StoreError) -> OperationOutcome {
    error!(error = %e, "{}", context);
    OperationOutcome::error(format!("{}: {}", context, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::ScriptedApprovalGate;
    use crate::directory::FixedClock;
    use crate::types::OutcomeKind;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn directory() -> (TempDir, EmployeeDirectory) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("employees.csv"));
        let clock = Arc::new(FixedClock::at(2025, 6, 2, 10).unwrap());
        (dir, EmployeeDirectory::new(store, clock))
    }

    #[test]
    fn test_check_exists_is_case_insensitive() {
        let (_dir, directory) = directory();
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        directory.store().save_all(&[Employee::new("Jane Doe", "JDoe", date)]).unwrap();

        let outcome = directory.check_exists("jdoe");
        assert_eq!(outcome.kind, OutcomeKind::Found);
        assert_eq!(
            outcome.message,
            "Employee found: Jane Doe (alias: JDoe, last accessed: 2025-05-01)"
        );
    }

    #[test]
    fn test_check_exists_not_found_without_collection() {
        let (_dir, directory) = directory();
        assert_eq!(directory.check_exists("ghost").kind, OutcomeKind::NotFound);
    }

    #[test]
    fn test_add_persists_after_approval() {
        let (_dir, directory) = directory();
        let mut gate = ScriptedApprovalGate::approving(1);

        let outcome = directory.add("Jane Doe", "jdoe", &mut gate);
        assert_eq!(outcome.kind, OutcomeKind::Completed);
        assert_eq!(gate.request_count(), 1);
        assert_eq!(
            gate.last_request().unwrap().details,
            "Add employee 'Jane Doe' with alias 'jdoe' to the database"
        );

        let employees = directory.store().load().unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].date_accessed, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert!(employees[0].badge_access.is_empty());
    }

    #[test]
    fn test_add_existing_name_skips_gate() {
        let (_dir, directory) = directory();
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        directory.store().save_all(&[Employee::new("Jane Doe", "jdoe", date)]).unwrap();
        let mut gate = ScriptedApprovalGate::approving(1);

        let outcome = directory.add("JANE DOE", "jdoe2", &mut gate);
        assert_eq!(outcome.kind, OutcomeKind::AlreadyExists);
        assert_eq!(gate.request_count(), 0);
        assert_eq!(directory.store().load().unwrap().len(), 1);
    }

    #[test]
    fn test_add_denied_writes_nothing() {
        let (_dir, directory) = directory();
        let mut gate = ScriptedApprovalGate::denying();

        let outcome = directory.add("Jane Doe", "jdoe", &mut gate);
        assert_eq!(outcome.kind, OutcomeKind::Cancelled);
        assert!(!directory.store().exists());
    }
}
