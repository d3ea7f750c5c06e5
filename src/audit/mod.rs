//! @acp:module "Integrity Audits"
//! @acp:summary "Integrity audit reports and violations"
//! @acp:domain audit
//! @acp:layer service
//!
//! Pre-publish static checks. The gate-spec audit makes sure no threshold has
//! been weakened relative to the checked-in contract and that mandated checks
//! are still wired in. The trigger audit makes sure the manifest entry points
//! delegate to the trigger evaluator instead of re-deriving conditions.
//!
//! Audits never pass silently: an unreadable or unparseable target is reported
//! as a violation.

pub mod contract;
pub mod gate_spec;
pub mod source;
pub mod triggers;

use std::fmt;

use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

pub use contract::{Bound, GateContract, ThresholdContract};
pub use gate_spec::{
    audit_gate_source, audit_gate_source_at, audit_gate_spec, audit_gate_spec_file,
    audit_gate_spec_path,
};
pub use triggers::{audit_trigger_isolation, audit_trigger_isolation_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Auditor {
    GateSpec,
    TriggerIsolation,
}

impl fmt::Display for Auditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auditor::GateSpec => f.write_str("gate-spec"),
            Auditor::TriggerIsolation => f.write_str("trigger-isolation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Threshold, check or function the violation concerns
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<String>,
    /// `path:line` when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Violation {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            expected: None,
            found: None,
            location: None,
        }
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)?;
        if let Some(expected) = &self.expected {
            write!(f, " (expected {}", expected)?;
            match &self.found {
                Some(found) => write!(f, ", found {})", found)?,
                None => write!(f, ")")?,
            }
        } else if let Some(found) = &self.found {
            write!(f, " (found {})", found)?;
        }
        if let Some(location) = &self.location {
            write!(f, " at {}", location)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub auditor: Auditor,
    /// What was audited, e.g. a source directory or spec file
    pub target: String,
    pub generated_at: DateTime<Utc>,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    pub fn new(auditor: Auditor, target: impl Into<String>) -> Self {
        Self {
            auditor,
            target: target.into(),
            generated_at: Utc::now(),
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, violation: Violation) {
        tracing::debug!("{} violation: {}", self.auditor, violation);
        self.violations.push(violation);
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// 0 when clean, 1 when any violation was found
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    /// Human-readable listing for the terminal
    pub fn print(&self) {
        if self.is_clean() {
            println!(
                "{} {} audit clean ({})",
                style("✓").green(),
                self.auditor,
                self.target
            );
            return;
        }
        println!(
            "{} {} audit found {} violation(s) in {}",
            style("✗").red(),
            self.auditor,
            self.violations.len(),
            self.target
        );
        for violation in &self.violations {
            println!("  {} {}", style("•").red(), violation);
        }
    }
}
