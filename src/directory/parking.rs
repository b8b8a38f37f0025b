//! Parking validation codes
//!
//! Codes are drawn uniformly from `A-Z0-9` with replacement. Issuance is an
//! append-only log; neither code uniqueness nor the employee's existence is checked.

use crate::approval::{ApprovalGate, ApprovalRequest};
use crate::directory::employee::storage_failure;
use crate::directory::outcome::require_arguments;
use crate::directory::{Clock, OperationOutcome};
use crate::store::RecordStore;
use crate::types::{defaults, Operation, ParkingRecord, DATE_FORMAT};
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

/// Symbols a parking code is drawn from
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random code generation and append-only issuance log
pub struct ParkingCodeIssuer {
    store: RecordStore<ParkingRecord>,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RngCore>,
    code_length: usize,
}

impl fmt::Debug for ParkingCodeIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParkingCodeIssuer")
            .field("store", &self.store)
            .field("code_length", &self.code_length)
            .finish()
    }
}

impl ParkingCodeIssuer {
    /// Create an issuer drawing from the thread-local generator
    pub fn new(store: RecordStore<ParkingRecord>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            rng: Box::new(rand::thread_rng()),
            code_length: defaults::PARKING_CODE_LENGTH,
        }
    }

    /// Create an issuer with a specific seed for reproducible codes
    pub fn with_seed(store: RecordStore<ParkingRecord>, clock: Arc<dyn Clock>, seed: u64) -> Self {
        Self {
            rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
            ..Self::new(store, clock)
        }
    }

    /// Override the code length
    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    /// The backing collection
    pub fn store(&self) -> &RecordStore<ParkingRecord> {
        &self.store
    }

    /// Draw a new code
    pub fn draw_code(&mut self) -> String {
        (0..self.code_length)
            .map(|_| char::from(CODE_ALPHABET[self.rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect()
    }

    /// Issue a parking code to `alias`.
    ///
    /// The code is drawn and approval requested first; the alias is not checked
    /// against the employee directory. On approval the record is appended, creating
    /// the collection on first issuance, and the code is returned as the outcome value.
    #[instrument(skip(self, gate))]
    pub fn generate(&mut self, alias: &str, gate: &mut dyn ApprovalGate) -> OperationOutcome {
        if let Err(outcome) = require_arguments(Operation::GenerateParkingCode, &[alias]) {
            return outcome;
        }
        let code = self.draw_code();

        let request = ApprovalRequest::new(
            "Generate Parking Code",
            format!("Generate parking code '{}' for employee '{}'", code, alias),
        );
        if !gate.request(&request).is_approved() {
            return OperationOutcome::cancelled(format!(
                "Operation cancelled: Parking code generation for '{}' was not approved.",
                alias
            ));
        }

        let today = self.clock.today();
        let record = ParkingRecord {
            alias: alias.to_string(),
            parking_code: code.clone(),
            date_issued: today,
        };
        if let Err(e) = self.store.append(record) {
            return storage_failure("Error generating parking code", &e);
        }

        info!(request_id = %request.id, alias, "Parking code issued");
        OperationOutcome::completed(format!(
            "Parking validation code generated: {}. Valid for {}. Please enter this code in the parking app to access parking.",
            code,
            today.format(DATE_FORMAT)
        ))
        .with_value(code)
    }
}
