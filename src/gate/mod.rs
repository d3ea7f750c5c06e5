//! @acp:module "Content Gate"
//! @acp:summary "Deterministic content quality checks"
//! @acp:domain gate
//! @acp:layer logic
//!
//! Deterministic, rule-based checks that decide whether generated prose is
//! publishable. Each check is a pure function over the document text; the
//! aggregate gate composes them into a single report with critical failures
//! and warnings.

pub mod aggregate;
pub mod citations;
pub mod hygiene;
pub mod sections;
pub mod size;
pub mod slop;
pub mod spec;
pub mod specificity;
pub mod thresholds;
pub mod types;
pub mod voice;

pub use aggregate::{evaluate_document, AggregateGate, CHECK_ORDER};
pub use citations::{Citation, CitationCategory, CitationCounter};
pub use size::{check_workout_coverage, find_workout_files};
pub use spec::{FeatureWeight, GateSpec, SpecFormat, Thresholds, VoiceWeights};
pub use types::{CheckDetails, CheckName, CheckOutcome, CheckResult, GateReport, Severity};
pub use voice::VoiceBreakdown;
