//! Approval gate port and its implementations
//!
//! This module contains the ApprovalGate trait together with the interactive console
//! gate, a scripted gate for tests and a static gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use uuid::Uuid;

/// Width of the console approval banner
const BANNER_WIDTH: usize = 70;

/// Outcome of an approval request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalDecision {
    /// The operator supplied the correct passkey
    Approved,
    /// Anything else: wrong or empty passkey, end of input, read failure
    Denied,
}

impl ApprovalDecision {
    /// Check if the request was approved
    pub fn is_approved(self) -> bool {
        matches!(self, ApprovalDecision::Approved)
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalDecision::Approved => write!(f, "Approved"),
            ApprovalDecision::Denied => write!(f, "Denied"),
        }
    }
}

/// A pending state change presented to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Unique identifier for log correlation
    pub id: Uuid,
    /// Name of the operation, e.g. "Add Employee"
    pub operation: String,
    /// Description of the exact change about to be written
    pub details: String,
    /// When the request was raised
    pub requested_at: DateTime<Utc>,
}

impl ApprovalRequest {
    /// Create a new request
    pub fn new(operation: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation: operation.into(),
            details: details.into(),
            requested_at: Utc::now(),
        }
    }
}

/// Human confirmation checkpoint guarding every state change.
///
/// Implementations are stateless between calls as far as the directories are
/// concerned: there is no session, retry limit or lockout.
pub trait ApprovalGate {
    /// Present the request and block until a decision is made
    fn request(&mut self, request: &ApprovalRequest) -> ApprovalDecision;
}

impl<G: ApprovalGate + ?Sized> ApprovalGate for Box<G> {
    fn request(&mut self, request: &ApprovalRequest) -> ApprovalDecision {
        (**self).request(request)
    }
}

impl<G: ApprovalGate + ?Sized> ApprovalGate for &mut G {
    fn request(&mut self, request: &ApprovalRequest) -> ApprovalDecision {
        (**self).request(request)
    }
}

/// Shared secret the operator must enter to approve a write
#[derive(Clone, PartialEq, Eq)]
pub struct Passkey(String);

impl Passkey {
    /// Wrap a configured secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exact, constant-time comparison against a candidate token
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    /// Check if no secret was configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Passkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passkey(<redacted>)")
    }
}

/// Interactive gate that prompts an operator on a text console
pub struct ConsoleApprovalGate<R, W> {
    passkey: Passkey,
    input: R,
    output: W,
}

impl<R, W> fmt::Debug for ConsoleApprovalGate<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleApprovalGate").field("passkey", &self.passkey).finish()
    }
}

impl ConsoleApprovalGate<StdinLock<'static>, Stdout> {
    /// Create a gate reading from standard input and writing to standard output
    pub fn stdio(passkey: Passkey) -> Self {
        Self::new(passkey, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleApprovalGate<R, W> {
    /// Create a gate over arbitrary input and output streams
    pub fn new(passkey: Passkey, input: R, output: W) -> Self {
        Self { passkey, input, output }
    }

    /// Consume the gate and return its output stream
    pub fn into_output(self) -> W {
        self.output
    }

    fn render_request(&mut self, request: &ApprovalRequest) -> io::Result<()> {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(self.output)?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "WRITE OPERATION APPROVAL REQUIRED")?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "Operation: {}", request.operation)?;
        writeln!(self.output, "Details: {}", request.details)?;
        writeln!(self.output)?;
        writeln!(self.output, "This operation will modify data files.")?;
        writeln!(self.output)?;
        writeln!(self.output, "To approve, enter the passkey (or press Enter to deny):")?;
        writeln!(self.output, "{}", rule)?;
        write!(self.output, "Enter passkey: ")?;
        self.output.flush()
    }

    fn read_token(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "Failed to read approval passkey");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> ApprovalGate for ConsoleApprovalGate<R, W> {
    fn request(&mut self, request: &ApprovalRequest) -> ApprovalDecision {
        if let Err(e) = self.render_request(request) {
            warn!(request_id = %request.id, error = %e, "Could not display approval request");
            return ApprovalDecision::Denied;
        }

        let decision = match self.read_token() {
            Some(token) if !token.is_empty() && self.passkey.matches(&token) => {
                ApprovalDecision::Approved
            }
            _ => ApprovalDecision::Denied,
        };

        let verdict = match decision {
            ApprovalDecision::Approved => "APPROVED - Operation will proceed",
            ApprovalDecision::Denied => "DENIED - Invalid passkey or operation cancelled",
        };
        // The decision stands even if the acknowledgement cannot be shown
        let _ = writeln!(self.output, "{}\n", verdict);

        info!(
            request_id = %request.id,
            operation = %request.operation,
            decision = %decision,
            "Approval request resolved"
        );
        decision
    }
}

/// Gate that replays a fixed script of decisions and records every request
#[derive(Debug, Default)]
pub struct ScriptedApprovalGate {
    script: VecDeque<ApprovalDecision>,
    requests: Vec<ApprovalRequest>,
}

impl ScriptedApprovalGate {
    /// Create a gate that answers with `decisions` in order, then denies
    pub fn new(decisions: impl IntoIterator<Item = ApprovalDecision>) -> Self {
        Self { script: decisions.into_iter().collect(), requests: Vec::new() }
    }

    /// Create a gate that approves the next `count` requests
    pub fn approving(count: usize) -> Self {
        Self::new(std::iter::repeat(ApprovalDecision::Approved).take(count))
    }

    /// Create a gate that denies everything
    pub fn denying() -> Self {
        Self::default()
    }

    /// Every request received so far
    pub fn requests(&self) -> &[ApprovalRequest] {
        &self.requests
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<&ApprovalRequest> {
        self.requests.last()
    }
}

impl ApprovalGate for ScriptedApprovalGate {
    fn request(&mut self, request: &ApprovalRequest) -> ApprovalDecision {
        self.requests.push(request.clone());
        self.script.pop_front().unwrap_or(ApprovalDecision::Denied)
    }
}

/// Gate that always returns the same decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticApprovalGate {
    decision: ApprovalDecision,
}

impl StaticApprovalGate {
    /// Approve every request
    pub fn approve_all() -> Self {
        Self { decision: ApprovalDecision::Approved }
    }

    /// Deny every request
    pub fn deny_all() -> Self {
        Self { decision: ApprovalDecision::Denied }
    }
}

impl ApprovalGate for StaticApprovalGate {
    fn request(&mut self, request: &ApprovalRequest) -> ApprovalDecision {
        info!(request_id = %request.id, decision = %self.decision, "Static approval");
        self.decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> ConsoleApprovalGate<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleApprovalGate::new(
            Passkey::new("1234"),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        )
    }

    fn request() -> ApprovalRequest {
        ApprovalRequest::new("Add Employee", "Add employee 'Jane Doe' with alias 'jdoe'")
    }

    #[test]
    fn test_console_gate_approves_matching_passkey() {
        let mut gate = console("1234\n");
        assert_eq!(gate.request(&request()), ApprovalDecision::Approved);

        let output = String::from_utf8(gate.into_output()).unwrap();
        assert!(output.contains("Operation: Add Employee"));
        assert!(output.contains("Details: Add employee 'Jane Doe' with alias 'jdoe'"));
        assert!(output.contains("Enter passkey:"));
        assert!(output.contains("APPROVED"));
    }

    #[test]
    fn test_console_gate_trims_whitespace() {
        let mut gate = console("  1234 \r\n");
        assert!(gate.request(&request()).is_approved());
    }

    #[test]
    fn test_console_gate_denies_wrong_empty_and_eof() {
        assert_eq!(console("4321\n").request(&request()), ApprovalDecision::Denied);
        assert_eq!(console("\n").request(&request()), ApprovalDecision::Denied);
        assert_eq!(console("").request(&request()), ApprovalDecision::Denied);
        assert_eq!(console("12345\n").request(&request()), ApprovalDecision::Denied);
    }

    #[test]
    fn test_console_gate_is_stateless_between_calls() {
        let mut gate = console("nope\n1234\n");
        assert_eq!(gate.request(&request()), ApprovalDecision::Denied);
        assert_eq!(gate.request(&request()), ApprovalDecision::Approved);
        // Input exhausted
        assert_eq!(gate.request(&request()), ApprovalDecision::Denied);
    }

    #[test]
    fn test_empty_passkey_never_approves() {
        let mut gate =
            ConsoleApprovalGate::new(Passkey::new(""), Cursor::new(b"\n".to_vec()), Vec::new());
        assert_eq!(gate.request(&request()), ApprovalDecision::Denied);
    }

    #[test]
    fn test_passkey_debug_is_redacted() {
        let passkey = Passkey::new("1234");
        assert!(!format!("{:?}", passkey).contains("1234"));
        assert!(passkey.matches("1234"));
        assert!(!passkey.matches("123"));
    }

    #[test]
    fn test_scripted_gate_replays_then_denies() {
        let mut gate =
            ScriptedApprovalGate::new([ApprovalDecision::Denied, ApprovalDecision::Approved]);
        assert_eq!(gate.request(&request()), ApprovalDecision::Denied);
        assert_eq!(gate.request(&request()), ApprovalDecision::Approved);
        assert_eq!(gate.request(&request()), ApprovalDecision::Denied);
        assert_eq!(gate.request_count(), 3);
        assert_eq!(gate.last_request().map(|r| r.operation.as_str()), Some("Add Employee"));
    }

    #[test]
    fn test_static_gate() {
        assert!(StaticApprovalGate::approve_all().request(&request()).is_approved());
        assert!(!StaticApprovalGate::deny_all().request(&request()).is_approved());
    }

    #[test]
    fn test_boxed_gate_delegates() {
        let mut gate: Box<dyn ApprovalGate> = Box::new(StaticApprovalGate::approve_all());
        assert!(gate.request(&request()).is_approved());
    }
}
