//! Badge access management
//!
//! Floor 1 is open to everyone and never stored. Floors 2-7 require badge access,
//! which only ever grows: a grant stores the union of the existing and requested
//! floors.

use crate::approval::{ApprovalGate, ApprovalRequest};
use crate::directory::employee::storage_failure;
use crate::directory::outcome::require_arguments;
use crate::directory::{EmployeeDirectory, OperationOutcome};
use crate::store::key_matches;
use crate::types::{floors, Employee, FloorSet, Operation};
use tracing::{debug, info, instrument};

/// What a badge grant request amounts to, before any approval
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeGrantPlan {
    /// No valid badge floor was requested
    InvalidFloors,
    /// Every requested floor is already granted
    AlreadySatisfied {
        /// Current access
        current: FloorSet,
    },
    /// Some floors are new
    Grant {
        /// Floors not previously granted
        added: FloorSet,
        /// Access after the grant
        total: FloorSet,
    },
}

/// Pure decision logic for badge grants
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeAccessManager;

impl BadgeAccessManager {
    /// Decide what granting `floors_csv` on top of `existing` requires
    pub fn plan(existing: &FloorSet, floors_csv: &str) -> BadgeGrantPlan {
        let requested = FloorSet::parse_request(floors_csv);
        if requested.is_empty() {
            return BadgeGrantPlan::InvalidFloors;
        }

        let added = requested.difference(existing);
        if added.is_empty() {
            return BadgeGrantPlan::AlreadySatisfied { current: existing.clone() };
        }

        BadgeGrantPlan::Grant { added, total: existing.union(&requested) }
    }

    /// Render an employee's current access, naming them by `alias` as the caller gave it
    pub fn describe_access(employee: &Employee, alias: &str) -> String {
        let note = format!(
            "Note: Floor {} is publicly accessible to everyone.",
            floors::PUBLIC_FLOOR
        );
        if employee.badge_access.is_empty() {
            format!(
                "Employee {} (alias: {}) currently has no restricted access (floors {}-{}). {}",
                employee.name,
                alias,
                floors::MIN_BADGE_FLOOR,
                floors::MAX_BADGE_FLOOR,
                note
            )
        } else {
            format!(
                "Employee {} (alias: {}) has badge access to: {}. {}",
                employee.name,
                alias,
                employee.badge_access.describe(),
                note
            )
        }
    }
}

impl EmployeeDirectory {
    /// Report which restricted floors an employee may enter. Read-only.
    #[instrument(skip(self))]
    pub fn check_badge_access(&self, alias: &str) -> OperationOutcome {
        if let Err(outcome) = require_arguments(Operation::CheckBadgeAccess, &[alias]) {
            return outcome;
        }
        match self.find_by_alias(alias) {
            Ok(Some(employee)) => {
                OperationOutcome::found(BadgeAccessManager::describe_access(&employee, alias))
            }
            Ok(None) => OperationOutcome::not_found(format!(
                "Employee with alias '{}' not found in the database.",
                alias
            )),
            Err(e) => storage_failure("Error checking badge access", &e),
        }
    }

    /// Grant additional restricted floors to an employee.
    ///
    /// Unknown aliases, requests with no valid floor and requests already covered by
    /// the existing access all return before approval is requested.
    #[instrument(skip(self, gate))]
    pub fn grant_badge_access(
        &self,
        alias: &str,
        floors_csv: &str,
        gate: &mut dyn ApprovalGate,
    ) -> OperationOutcome {
        if let Err(outcome) =
            require_arguments(Operation::UpdateBadgeAccess, &[alias, floors_csv])
        {
            return outcome;
        }
        let mut employees = match self.store.load() {
            Ok(employees) => employees,
            Err(e) => return storage_failure("Error updating badge access", &e),
        };

        let Some(index) = employees.iter().position(|e| key_matches(&e.alias, alias)) else {
            return OperationOutcome::not_found(format!(
                "Employee with alias '{}' not found in the database.",
                alias
            ));
        };

        let employee = &employees[index];
        let (added, total) = match BadgeAccessManager::plan(&employee.badge_access, floors_csv) {
            BadgeGrantPlan::InvalidFloors => {
                return OperationOutcome::invalid_input(format!(
                    "Invalid floor numbers. Please specify floors between {} and {}. Note: Floor {} is publicly accessible and doesn't require badge access.",
                    floors::MIN_BADGE_FLOOR,
                    floors::MAX_BADGE_FLOOR,
                    floors::PUBLIC_FLOOR
                ));
            }
            BadgeGrantPlan::AlreadySatisfied { current } => {
                debug!(alias, "Requested floors already granted");
                return OperationOutcome::already_satisfied(format!(
                    "{} (alias: {}) already has access to the requested floors. Current access: {}",
                    employee.name,
                    alias,
                    current.describe()
                ));
            }
            BadgeGrantPlan::Grant { added, total } => (added, total),
        };

        let request = ApprovalRequest::new(
            "Update Badge Access",
            format!(
                "Grant {} ({}) access to: {}. Total access will be: {}",
                employee.name,
                alias,
                added.describe(),
                total.describe()
            ),
        );
        if !gate.request(&request).is_approved() {
            return OperationOutcome::cancelled(format!(
                "Operation cancelled: Badge access update for '{}' was not approved.",
                employee.name
            ));
        }

        employees[index].badge_access = total.clone();
        if let Err(e) = self.store.save_all(&employees) {
            return storage_failure("Error updating badge access", &e);
        }

        let employee = &employees[index];
        info!(
            request_id = %request.id,
            alias = %employee.alias,
            added = %added,
            total = %total,
            "Badge access granted"
        );
        OperationOutcome::completed(format!(
            "Successfully updated badge access for {} (alias: {}). Added: {}. Total access now: {}",
            employee.name,
            alias,
            added.describe(),
            total.describe()
        ))
    }
}
