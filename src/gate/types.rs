//! @acp:module "Gate Types"
//! @acp:summary "Check results and aggregate report types"
//! @acp:domain gate
//! @acp:layer model
//!
//! Check names, severities, per-check results and the aggregate report.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::content::ContentType;
use crate::phrases::PhraseMatch;

use super::citations::CitationCategory;
use super::voice::VoiceBreakdown;

/// Stable identifier of a gate check
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    Content,
    Slop,
    Voice,
    Specificity,
    Sections,
    Citations,
    Placeholder,
    NullText,
    GuideSize,
    WorkoutCoverage,
}

impl CheckName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckName::Content => "content",
            CheckName::Slop => "slop",
            CheckName::Voice => "voice",
            CheckName::Specificity => "specificity",
            CheckName::Sections => "sections",
            CheckName::Citations => "citations",
            CheckName::Placeholder => "placeholder",
            CheckName::NullText => "null_text",
            CheckName::GuideSize => "guide_size",
            CheckName::WorkoutCoverage => "workout_coverage",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a failing check blocks publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

/// Structured payload of a check, one shape per check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckDetails {
    Content {
        blank: bool,
        bytes: usize,
    },
    Slop {
        slop_count: usize,
        slop_found: Vec<PhraseMatch>,
    },
    Voice(VoiceBreakdown),
    Specificity {
        mile_markers: usize,
        reddit_usernames: usize,
        percentages: usize,
        categories_hit: usize,
    },
    Sections {
        required: usize,
        missing_sections: Vec<String>,
    },
    Citations {
        total: usize,
        minimum: usize,
        breakdown: BTreeMap<CitationCategory, usize>,
    },
    Hygiene {
        occurrences: Vec<PhraseMatch>,
    },
    Size {
        bytes: usize,
        min_bytes: usize,
        max_bytes: usize,
    },
    WorkoutCoverage {
        weeks: u32,
        workout_files: usize,
        required_files: usize,
    },
}

/// Pass/fail and payload before a severity is attached
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub details: CheckDetails,
}

impl CheckOutcome {
    pub fn into_result(self, name: CheckName, severity: Severity) -> CheckResult {
        CheckResult {
            name,
            passed: self.passed,
            severity,
            details: self.details,
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: CheckName,
    pub passed: bool,
    pub severity: Severity,
    pub details: CheckDetails,
}

impl CheckResult {
    pub fn is_critical_failure(&self) -> bool {
        !self.passed && self.severity == Severity::Critical
    }

    pub fn is_warning_failure(&self) -> bool {
        !self.passed && self.severity == Severity::Warning
    }
}

/// Aggregate verdict for one document.
///
/// `overall_passed` is derived from `critical_failures` and never stored, so the
/// two cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct GateReport {
    content_type: ContentType,
    spec_version: String,
    spec_fingerprint: String,
    checks: Vec<CheckResult>,
    critical_failures: Vec<CheckName>,
    warnings: Vec<CheckName>,
}

impl GateReport {
    /// Assemble a report from results in execution order
    pub fn from_results(
        content_type: ContentType,
        spec_version: impl Into<String>,
        spec_fingerprint: impl Into<String>,
        checks: Vec<CheckResult>,
    ) -> Self {
        let critical_failures = checks
            .iter()
            .filter(|c| c.is_critical_failure())
            .map(|c| c.name)
            .collect();
        let warnings = checks
            .iter()
            .filter(|c| c.is_warning_failure())
            .map(|c| c.name)
            .collect();

        Self {
            content_type,
            spec_version: spec_version.into(),
            spec_fingerprint: spec_fingerprint.into(),
            checks,
            critical_failures,
            warnings,
        }
    }

    pub fn overall_passed(&self) -> bool {
        self.critical_failures.is_empty()
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    pub fn spec_fingerprint(&self) -> &str {
        &self.spec_fingerprint
    }

    /// Results in execution order
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    pub fn check(&self, name: CheckName) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn critical_failures(&self) -> &[CheckName] {
        &self.critical_failures
    }

    pub fn warnings(&self) -> &[CheckName] {
        &self.warnings
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Checks serialize as a map keyed by check name, in execution order
struct OrderedChecks<'a>(&'a [CheckResult]);

impl Serialize for OrderedChecks<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for check in self.0 {
            map.serialize_entry(check.name.as_str(), check)?;
        }
        map.end()
    }
}

impl Serialize for GateReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GateReport", 7)?;
        state.serialize_field("content_type", &self.content_type)?;
        state.serialize_field("spec_version", &self.spec_version)?;
        state.serialize_field("spec_fingerprint", &self.spec_fingerprint)?;
        state.serialize_field("overall_passed", &self.overall_passed())?;
        state.serialize_field("checks", &OrderedChecks(&self.checks))?;
        state.serialize_field("critical_failures", &self.critical_failures)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: CheckName, passed: bool, severity: Severity) -> CheckResult {
        CheckResult {
            name,
            passed,
            severity,
            details: CheckDetails::Content {
                blank: false,
                bytes: 1,
            },
        }
    }

    #[test]
    fn test_overall_follows_critical_failures() {
        let report = GateReport::from_results(
            ContentType::Research,
            "v",
            "f",
            vec![
                result(CheckName::Slop, true, Severity::Critical),
                result(CheckName::Voice, false, Severity::Warning),
            ],
        );
        assert!(report.overall_passed());
        assert_eq!(report.warnings(), &[CheckName::Voice]);

        let report = GateReport::from_results(
            ContentType::Research,
            "v",
            "f",
            vec![result(CheckName::Citations, false, Severity::Critical)],
        );
        assert!(!report.overall_passed());
        assert_eq!(report.critical_failures(), &[CheckName::Citations]);
    }

    #[test]
    fn test_checks_serialize_in_execution_order() {
        let report = GateReport::from_results(
            ContentType::Brief,
            "v",
            "f",
            vec![
                result(CheckName::Voice, true, Severity::Warning),
                result(CheckName::Content, true, Severity::Critical),
            ],
        );
        let json = report.to_json().unwrap();
        let voice = json.find("\"voice\"").unwrap();
        let content = json.find("\"content\"").unwrap();
        assert!(voice < content);
        assert!(json.contains("\"overall_passed\": true"));
    }
}
