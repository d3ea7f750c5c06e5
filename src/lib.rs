#![forbid(unsafe_code)]

//! @acp:module "guidegate Library"
//! @acp:summary "Deterministic quality gate for generated race content"
//! @acp:domain gate
//! @acp:layer api
//! @acp:stability stable
//!
//! # guidegate
//!
//! Deterministic quality gate for generated race research, briefs and
//! athlete guides.
//!
//! ## Features
//!
//! - **Content gate**: slop, voice, specificity, section, citation and hygiene
//!   checks folded into one report with critical failures and warnings
//! - **Trigger engine**: one evaluator decides which optional guide sections an
//!   athlete gets; the manifest builder only sees its result
//! - **Integrity audits**: static checks that thresholds were not weakened and
//!   trigger logic was not duplicated
//!
//! ## Example
//!
//! ```rust,no_run
//! use guidegate::{evaluate_document, ContentType};
//!
//! let report = evaluate_document("## Verdict\nRide it.", ContentType::Brief);
//! println!("{}", report.to_json().unwrap());
//! assert_eq!(report.overall_passed(), report.critical_failures().is_empty());
//! ```

pub mod audit;
pub mod batch;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod gate;
pub mod manifest;
pub mod phrases;
pub mod trigger;

// Re-exports
pub use audit::{AuditReport, Auditor, GateContract, Violation};
pub use batch::{run_batch, BatchSummary};
pub use config::Config;
pub use content::{ContentDocument, ContentType};
pub use error::{GateError, Result};
pub use gate::{
    evaluate_document, AggregateGate, CheckName, CheckResult, GateReport, GateSpec, Severity,
};
pub use manifest::{
    build_body, build_toc, evaluate_trigger_section_manifest, verify_alignment, SectionManifest,
};
pub use phrases::{PhraseMatch, PhraseSets};
pub use trigger::{evaluate as evaluate_triggers, AthleteProfile, Sex, TriggerSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
