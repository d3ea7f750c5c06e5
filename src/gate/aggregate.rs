//! @acp:module "Aggregate Gate"
//! @acp:summary "Compose document checks into one gate report"
//! @acp:domain gate
//! @acp:layer service
//!
//! Runs every document check in a fixed order and folds the results into one
//! [`GateReport`]. The severity table in the gate spec decides which checks run
//! for a content type and which failures block publication.
//!
//! Text input never produces an error: blank or missing documents fail the
//! critical `content` check and get a normal, deterministic report.

use std::sync::{Arc, LazyLock};

use crate::content::{ContentDocument, ContentType};
use crate::error::Result;
use crate::phrases::PhraseSets;

use super::citations::CitationCounter;
use super::hygiene::HygieneChecker;
use super::sections::check_sections;
use super::size::check_guide_size;
use super::slop::SlopDetector;
use super::spec::GateSpec;
use super::specificity::SpecificityScorer;
use super::types::{CheckDetails, CheckName, CheckOutcome, GateReport};
use super::voice::VoiceScorer;

/// Execution order of document checks
pub const CHECK_ORDER: [CheckName; 9] = [
    CheckName::Content,
    CheckName::Slop,
    CheckName::Voice,
    CheckName::Specificity,
    CheckName::Sections,
    CheckName::Citations,
    CheckName::Placeholder,
    CheckName::NullText,
    CheckName::GuideSize,
];

static BUILTIN_GATE: LazyLock<AggregateGate> = LazyLock::new(|| {
    AggregateGate::builtin().expect("built-in gate spec and phrase sets are valid")
});

/// Evaluate text against the built-in gate spec and phrase sets
pub fn evaluate_document(text: &str, content_type: ContentType) -> GateReport {
    BUILTIN_GATE.evaluate(&ContentDocument::new(text, content_type))
}

/// Composed gate with pre-compiled checks.
///
/// Holds only immutable state, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct AggregateGate {
    spec: Arc<GateSpec>,
    phrases: Arc<PhraseSets>,
    fingerprint: String,
    slop: SlopDetector,
    voice: VoiceScorer,
    specificity: SpecificityScorer,
    citations: CitationCounter,
    hygiene: HygieneChecker,
}

impl AggregateGate {
    pub fn new(spec: Arc<GateSpec>, phrases: Arc<PhraseSets>) -> Result<Self> {
        spec.validate()?;
        let t = &spec.thresholds;

        Ok(Self {
            slop: SlopDetector::new(&phrases, t.slop_ceiling)?,
            voice: VoiceScorer::new(&phrases, spec.voice_weights.clone(), t.min_voice_score)?,
            specificity: SpecificityScorer::new(t.min_specificity_categories),
            citations: CitationCounter::new(phrases.source_categories.clone()),
            hygiene: HygieneChecker::new(&phrases)?,
            fingerprint: spec.fingerprint(),
            spec,
            phrases,
        })
    }

    /// Gate over the compiled-in spec and phrase tables
    pub fn builtin() -> anyhow::Result<Self> {
        let phrases = PhraseSets::builtin()?;
        Ok(Self::new(Arc::new(GateSpec::builtin()), Arc::new(phrases))?)
    }

    pub fn spec(&self) -> &GateSpec {
        &self.spec
    }

    pub fn phrases(&self) -> &PhraseSets {
        &self.phrases
    }

    pub fn evaluate(&self, document: &ContentDocument) -> GateReport {
        let content_type = document.content_type();
        let mut results = Vec::with_capacity(CHECK_ORDER.len());

        for name in CHECK_ORDER {
            let Some(severity) = self.spec.severity(content_type, name) else {
                continue;
            };
            if let Some(outcome) = self.run_check(name, document) {
                results.push(outcome.into_result(name, severity));
            }
        }

        let report = GateReport::from_results(
            content_type,
            self.spec.version.clone(),
            self.fingerprint.clone(),
            results,
        );
        tracing::debug!(
            "{} gate: passed={} critical={:?} warnings={:?}",
            content_type,
            report.overall_passed(),
            report.critical_failures(),
            report.warnings()
        );
        report
    }

    pub fn evaluate_text(&self, text: &str, content_type: ContentType) -> GateReport {
        self.evaluate(&ContentDocument::new(text, content_type))
    }

    fn run_check(&self, name: CheckName, document: &ContentDocument) -> Option<CheckOutcome> {
        let text = document.text();
        let content_type = document.content_type();
        let thresholds = &self.spec.thresholds;

        let outcome = match name {
            CheckName::Content => CheckOutcome {
                passed: !document.is_blank(),
                details: CheckDetails::Content {
                    blank: document.is_blank(),
                    bytes: document.byte_len(),
                },
            },
            CheckName::Slop => self.slop.run(text),
            CheckName::Voice => self.voice.run(text),
            CheckName::Specificity => self.specificity.run(text),
            CheckName::Sections => check_sections(text, self.spec.required_sections(content_type)),
            CheckName::Citations => self
                .citations
                .run(text, thresholds.min_citations(content_type)),
            CheckName::Placeholder => self.hygiene.check_placeholders(text),
            CheckName::NullText => self.hygiene.check_null_text(text),
            CheckName::GuideSize => check_guide_size(document.byte_len(), thresholds),
            // Plan bundles are checked by `size::check_workout_coverage`
            CheckName::WorkoutCoverage => return None,
        };
        Some(outcome)
    }
}
