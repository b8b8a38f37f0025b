//! Named-operation dispatcher
//!
//! [`AccessDirectory`] wires the three collections, the clock and the approval gate
//! together from a [`DirectoryConfig`] and exposes every operation both as a typed
//! method and by name with string arguments.

use crate::approval::ApprovalGate;
use crate::directory::{
    Clock, EmployeeDirectory, GuestDirectory, OperationOutcome, ParkingCodeIssuer, SystemClock,
};
use crate::service::error::{ServiceError, ServiceResult};
use crate::store::{RecordStore, StoreError};
use crate::types::{DirectoryConfig, Operation};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// The access directory: employees, guests and parking codes behind one approval gate
pub struct AccessDirectory<G: ApprovalGate = Box<dyn ApprovalGate>> {
    config: DirectoryConfig,
    employees: EmployeeDirectory,
    guests: GuestDirectory,
    parking: ParkingCodeIssuer,
    gate: G,
}

impl<G: ApprovalGate> fmt::Debug for AccessDirectory<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessDirectory")
            .field("data_dir", &self.config.data_dir)
            .field("employees", &self.employees)
            .field("guests", &self.guests)
            .field("parking", &self.parking)
            .finish_non_exhaustive()
    }
}

impl<G: ApprovalGate> AccessDirectory<G> {
    /// Open the directory described by `config` using the system clock
    pub fn open(config: DirectoryConfig, gate: G) -> ServiceResult<Self> {
        Self::with_clock(config, gate, Arc::new(SystemClock))
    }

    /// Open the directory with an explicit clock.
    ///
    /// Validates the configuration and creates the data directory if needed. The
    /// collections themselves are created lazily on first write.
    pub fn with_clock(
        config: DirectoryConfig,
        gate: G,
        clock: Arc<dyn Clock>,
    ) -> ServiceResult<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir).map_err(|e| StoreError::io(&config.data_dir, e))?;

        let employees =
            EmployeeDirectory::new(RecordStore::new(config.employees_path()), clock.clone());
        let guests = GuestDirectory::new(RecordStore::new(config.guests_path()), clock.clone())
            .with_expiration_days(config.guest_expiration_days);
        let parking_store = RecordStore::new(config.parking_records_path());
        let parking = match config.seed {
            Some(seed) => ParkingCodeIssuer::with_seed(parking_store, clock, seed),
            None => ParkingCodeIssuer::new(parking_store, clock),
        }
        .with_code_length(config.parking_code_length);

        info!(data_dir = %config.data_dir.display(), "Access directory opened");
        Ok(Self { config, employees, guests, parking, gate })
    }

    /// Active configuration
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Employee directory
    pub fn employees(&self) -> &EmployeeDirectory {
        &self.employees
    }

    /// Guest directory
    pub fn guests(&self) -> &GuestDirectory {
        &self.guests
    }

    /// Parking code issuer
    pub fn parking(&self) -> &ParkingCodeIssuer {
        &self.parking
    }

    /// Approval gate
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Approval gate, mutably
    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    /// Consume the directory and return its gate
    pub fn into_gate(self) -> G {
        self.gate
    }

    /// Look up an employee by alias
    pub fn check_employee_exists(&self, alias: &str) -> OperationOutcome {
        self.employees.check_exists(alias)
    }

    /// Register a new employee
    pub fn add_employee(&mut self, name: &str, alias: &str) -> OperationOutcome {
        self.employees.add(name, alias, &mut self.gate)
    }

    /// Show an employee's restricted floors
    pub fn check_badge_access(&self, alias: &str) -> OperationOutcome {
        self.employees.check_badge_access(alias)
    }

    /// Grant additional restricted floors
    pub fn update_badge_access(&mut self, alias: &str, floors: &str) -> OperationOutcome {
        self.employees.grant_badge_access(alias, floors, &mut self.gate)
    }

    /// Look up a guest, with expiration
    pub fn check_guest_exists(&self, first_name: &str, last_name: &str) -> OperationOutcome {
        self.guests.check_exists(first_name, last_name)
    }

    /// Remove a guest
    pub fn remove_expired_guest(&mut self, first_name: &str, last_name: &str) -> OperationOutcome {
        self.guests.remove(first_name, last_name, &mut self.gate)
    }

    /// Register a guest under a chosen alias
    pub fn add_guest(&mut self, first_name: &str, last_name: &str, alias: &str) -> OperationOutcome {
        self.guests.add(first_name, last_name, alias, &mut self.gate)
    }

    /// Register a guest under a generated alias
    pub fn add_guest_with_auto_alias(
        &mut self,
        first_name: &str,
        last_name: &str,
    ) -> OperationOutcome {
        self.guests.add_with_auto_alias(first_name, last_name, &mut self.gate)
    }

    /// Issue a parking validation code
    pub fn generate_parking_code(&mut self, alias: &str) -> OperationOutcome {
        self.parking.generate(alias, &mut self.gate)
    }

    /// Run an operation by name.
    ///
    /// Unknown names and missing or blank arguments produce an input-error outcome
    /// without consulting the gate. Argument values are trimmed; extra keys are ignored.
    pub fn invoke(&mut self, name: &str, args: &BTreeMap<String, String>) -> OperationOutcome {
        let span = info_span!("operation", name = %name.trim());
        let _enter = span.enter();

        let outcome = match resolve(name, args) {
            Ok((operation, values)) => self.dispatch(operation, &values),
            Err(e) => {
                warn!(error = %e, "Rejected operation request");
                OperationOutcome::invalid_input(e.to_string())
            }
        };

        info!(kind = %outcome.kind, "Operation finished");
        outcome
    }

    /// Run an operation by name with arguments given as a JSON object.
    ///
    /// String and number values are accepted; `null` counts as absent.
    pub fn invoke_json(&mut self, name: &str, args: &Value) -> OperationOutcome {
        match json_arguments(args) {
            Ok(args) => self.invoke(name, &args),
            Err(e) => OperationOutcome::invalid_input(e.to_string()),
        }
    }

    fn dispatch(&mut self, operation: Operation, values: &[String]) -> OperationOutcome {
        match (operation, values) {
            (Operation::CheckEmployeeExists, [alias]) => self.check_employee_exists(alias),
            (Operation::AddEmployee, [name, alias]) => self.add_employee(name, alias),
            (Operation::CheckBadgeAccess, [alias]) => self.check_badge_access(alias),
            (Operation::UpdateBadgeAccess, [alias, floors]) => {
                self.update_badge_access(alias, floors)
            }
            (Operation::CheckGuestExists, [first, last]) => self.check_guest_exists(first, last),
            (Operation::RemoveExpiredGuest, [first, last]) => {
                self.remove_expired_guest(first, last)
            }
            (Operation::AddGuest, [first, last, alias]) => self.add_guest(first, last, alias),
            (Operation::AddGuestWithAutoAlias, [first, last]) => {
                self.add_guest_with_auto_alias(first, last)
            }
            (Operation::GenerateParkingCode, [alias]) => self.generate_parking_code(alias),
            (operation, values) => OperationOutcome::invalid_input(format!(
                "{} expects {} argument(s), got {}",
                operation,
                operation.parameters().len(),
                values.len()
            )),
        }
    }
}

/// Resolve an operation name and collect its required arguments in order
pub fn resolve(
    name: &str,
    args: &BTreeMap<String, String>,
) -> ServiceResult<(Operation, Vec<String>)> {
    let operation: Operation = name.parse().map_err(|_| {
        ServiceError::UnknownOperation(format!(
            "{} (available: {})",
            name.trim(),
            Operation::ALL.map(Operation::name).join(", ")
        ))
    })?;

    let values: Vec<&str> = operation
        .parameters()
        .iter()
        .map(|parameter| args.get(*parameter).map_or("", |v| v.trim()))
        .collect();
    if let Some(argument) = operation.first_blank_argument(&values) {
        return Err(ServiceError::missing_argument(operation.name(), argument));
    }

    Ok((operation, values.into_iter().map(str::to_string).collect()))
}

/// Parse `key=value` pairs as given on the command line
pub fn parse_key_value_args<S: AsRef<str>>(pairs: &[S]) -> ServiceResult<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    Ok((key.trim().to_string(), value.to_string()))
                }
                _ => Err(ServiceError::invalid_arguments(format!(
                    "expected KEY=VALUE, got '{}'",
                    pair
                ))),
            }
        })
        .collect()
}

/// Convert a JSON object of arguments into string arguments
pub fn json_arguments(args: &Value) -> ServiceResult<BTreeMap<String, String>> {
    let object = args
        .as_object()
        .ok_or_else(|| ServiceError::invalid_arguments("arguments must be a JSON object"))?;

    let mut result = BTreeMap::new();
    for (key, value) in object {
        let value = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(ServiceError::invalid_arguments(format!(
                    "argument '{}' must be a string, got {}",
                    key, other
                )));
            }
        };
        result.insert(key.clone(), value);
    }
    Ok(result)
}
