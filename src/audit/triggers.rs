//! @acp:module "Trigger-Isolation Integrity"
//! @acp:summary "Trigger isolation audit over manifest entry points"
//! @acp:domain audit
//! @acp:layer analysis
//!
//! Scans the two manifest entry points for raw trigger conditions that should
//! come from `trigger::evaluate`, and confirms the evaluator still holds all
//! three conditions. Rendering helpers are out of scope: only `build_toc`,
//! `build_body` and their table-taking `_with` variants are scanned.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::source::{find_fn, mask_source};
use super::{AuditReport, Auditor, Violation};

pub const BUILDER_PATH: &str = "src/manifest/builder.rs";
pub const EVALUATOR_PATH: &str = "src/trigger/evaluator.rs";
pub const ENTRY_POINTS: [&str; 2] = ["build_toc", "build_body"];
/// Scanned the same way when present
pub const TABLE_VARIANTS: [&str; 2] = ["build_toc_with", "build_body_with"];
pub const EVALUATOR_FN: &str = "evaluate";

const CMP: &str = r"(?:[<>]=?|[=!]=)";

static ALTITUDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i:\belevation\w*)\s*{CMP}|{CMP}\s*[\w.]*(?i:elevation)\w*|\b5_?000\b|\bALTITUDE_THRESHOLD_FT\b"
    ))
    .unwrap()
});

static SEX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bsex\s*[=!]=|[=!]=\s*[\w.]*\bsex\b|\bSex::\w+|\bmatches!\s*\(\s*[\w.]*\bsex\b")
        .unwrap()
});

static AGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\bage\s*{CMP}|{CMP}\s*[\w.]*\bage\b|\bMASTERS_AGE\b|\bage\s*\.\s*(?:cmp|ge|gt|le|lt)\s*\("
    ))
    .unwrap()
});

static PROFILE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bAthleteProfile\b").unwrap());

/// One of the three trigger conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    Altitude,
    Sex,
    Age,
}

impl TriggerCondition {
    pub const ALL: [TriggerCondition; 3] = [
        TriggerCondition::Altitude,
        TriggerCondition::Sex,
        TriggerCondition::Age,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            TriggerCondition::Altitude => &ALTITUDE_PATTERN,
            TriggerCondition::Sex => &SEX_PATTERN,
            TriggerCondition::Age => &AGE_PATTERN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TriggerCondition::Altitude => "altitude threshold",
            TriggerCondition::Sex => "sex comparison",
            TriggerCondition::Age => "age comparison",
        }
    }
}

/// Audit builder and evaluator source text
pub fn audit_trigger_isolation(builder_src: &str, evaluator_src: &str) -> AuditReport {
    let mut report = AuditReport::new(Auditor::TriggerIsolation, "manifest builder");
    scan_entry_points(builder_src, &mut report);
    check_evaluator(evaluator_src, &mut report);
    report
}

/// Read and audit the builder and evaluator under a crate root
pub fn audit_trigger_isolation_at(root: &Path) -> AuditReport {
    let builder = std::fs::read_to_string(root.join(BUILDER_PATH));
    let evaluator = std::fs::read_to_string(root.join(EVALUATOR_PATH));

    let mut report = AuditReport::new(Auditor::TriggerIsolation, root.display().to_string());
    for (path, result) in [(BUILDER_PATH, &builder), (EVALUATOR_PATH, &evaluator)] {
        if let Err(e) = result {
            report.push(
                Violation::new(path, format!("cannot read audit target: {}", e))
                    .at(root.join(path).display().to_string()),
            );
        }
    }
    if let Ok(src) = &builder {
        scan_entry_points(src, &mut report);
    }
    if let Ok(src) = &evaluator {
        check_evaluator(src, &mut report);
    }
    report
}

fn scan_entry_points(src: &str, report: &mut AuditReport) {
    let masked = mask_source(src, true);
    let original: Vec<&str> = src.lines().collect();

    let required = ENTRY_POINTS.into_iter().map(|name| (name, true));
    let variants = TABLE_VARIANTS.into_iter().map(|name| (name, false));
    for (entry, required) in required.chain(variants) {
        let Some(span) = find_fn(&masked, entry) else {
            if required {
                report.push(
                    Violation::new(
                        entry,
                        "entry point not found; single source of truth may have been deleted",
                    )
                    .at(BUILDER_PATH),
                );
            }
            continue;
        };

        if PROFILE_PARAM.is_match(&masked[span.signature.clone()]) {
            report.push(
                Violation::new(entry, "entry point takes a raw athlete profile")
                    .expected("&TriggerSet")
                    .at(format!("{}:{}", BUILDER_PATH, span.line)),
            );
        }

        for (offset, line) in masked[span.body.clone()].lines().enumerate() {
            let line_no = span.body_line + offset;
            for condition in TriggerCondition::ALL {
                if condition.pattern().is_match(line) {
                    let text = original.get(line_no - 1).map(|l| l.trim()).unwrap_or("");
                    report.push(
                        Violation::new(
                            entry,
                            format!(
                                "duplicated trigger logic: {} recomputed instead of using \
                                 trigger::evaluate",
                                condition.label()
                            ),
                        )
                        .expected("TriggerSet accessor")
                        .found(text)
                        .at(format!("{}:{}", BUILDER_PATH, line_no)),
                    );
                }
            }
        }
    }
}

fn check_evaluator(src: &str, report: &mut AuditReport) {
    let masked = mask_source(src, true);
    let Some(span) = find_fn(&masked, EVALUATOR_FN) else {
        report.push(
            Violation::new(
                EVALUATOR_FN,
                "trigger evaluator not found; single source of truth may have been deleted",
            )
            .at(EVALUATOR_PATH),
        );
        return;
    };

    let body = &masked[span.body];
    for condition in TriggerCondition::ALL {
        if !condition.pattern().is_match(body) {
            report.push(
                Violation::new(
                    EVALUATOR_FN,
                    format!("evaluator no longer computes the {}", condition.label()),
                )
                .at(format!("{}:{}", EVALUATOR_PATH, span.line)),
            );
        }
    }
}
