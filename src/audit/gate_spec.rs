//! @acp:module "Gate-Spec Integrity"
//! @acp:summary "Gate threshold and severity integrity audit"
//! @acp:domain audit
//! @acp:layer analysis
//!
//! Compares live threshold definitions against the threshold contract. Works on
//! either the gate source (constants, the check order and the built-in spec's
//! severity table) or a gate spec override file (threshold view and severity
//! table).

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::gate::{GateSpec, Severity, SpecFormat};

use super::contract::GateContract;
use super::source::{parse_check_array, parse_consts};
use super::{AuditReport, Auditor, Violation};

pub const THRESHOLDS_PATH: &str = "src/gate/thresholds.rs";
pub const AGGREGATE_PATH: &str = "src/gate/aggregate.rs";
pub const SPEC_PATH: &str = "src/gate/spec.rs";
const CHECK_ORDER: &str = "CHECK_ORDER";

/// A threshold value as found in the target, with where it was found
struct Found {
    value: f64,
    location: Option<String>,
}

/// Audit the gate source: threshold constants, the check order and the
/// built-in spec assembled from them.
///
/// `builtin` is the spec compiled from the audited tree. Its threshold view must
/// agree with the constants and its severity table must run and block every
/// mandated check.
pub fn audit_gate_source(
    thresholds_src: &str,
    aggregate_src: &str,
    builtin: &GateSpec,
    contract: &GateContract,
) -> AuditReport {
    let mut report = AuditReport::new(Auditor::GateSpec, "gate source");

    let consts = parse_consts(thresholds_src);
    let mut found = BTreeMap::new();
    for (name, def) in &consts {
        let location = Some(format!("{}:{}", THRESHOLDS_PATH, def.line));
        match def.value.as_f64() {
            Some(value) => {
                found.insert(name.clone(), Found { value, location });
            }
            None if contract.thresholds.contains_key(name) => report.push(
                Violation::new(name, "threshold is not a literal the audit can read")
                    .found(format!("{:?}", def.value))
                    .at(format!("{}:{}", THRESHOLDS_PATH, def.line)),
            ),
            None => {}
        }
    }
    compare_thresholds(&found, contract, THRESHOLDS_PATH, &mut report);
    compare_builtin_wiring(&found, builtin, contract, &mut report);
    compare_voice_weights(builtin, contract, &mut report);
    compare_severities(builtin, contract, SPEC_PATH, &mut report);

    match parse_check_array(aggregate_src, CHECK_ORDER) {
        Some((names, line)) => {
            for check in contract.required_checks.keys() {
                if !names.iter().any(|n| n == check.as_str()) {
                    report.push(
                        Violation::new(
                            check.as_str(),
                            "mandated check is missing from the gate's check order",
                        )
                        .expected(format!("{} in {}", check, CHECK_ORDER))
                        .at(format!("{}:{}", AGGREGATE_PATH, line)),
                    );
                }
            }
        }
        None => report.push(
            Violation::new(
                CHECK_ORDER,
                "check order not found; single source of truth may have been deleted",
            )
            .at(AGGREGATE_PATH),
        ),
    }

    report
}

/// Audit a parsed gate spec: threshold view and severity table
pub fn audit_gate_spec(spec: &GateSpec, contract: &GateContract, origin: &str) -> AuditReport {
    let mut report = AuditReport::new(Auditor::GateSpec, origin);
    if spec.version != contract.version {
        tracing::info!(
            "Gate spec version {} differs from contract version {}",
            spec.version,
            contract.version
        );
    }

    let found: BTreeMap<String, Found> = spec
        .threshold_values()
        .into_iter()
        .map(|(name, value)| {
            (
                name,
                Found {
                    value,
                    location: None,
                },
            )
        })
        .collect();
    compare_thresholds(&found, contract, origin, &mut report);
    compare_severities(spec, contract, origin, &mut report);

    report
}

/// Audit gate spec override text. Text that does not parse is a violation.
pub fn audit_gate_spec_file(
    raw: &str,
    format: SpecFormat,
    origin: &Path,
    contract: &GateContract,
) -> AuditReport {
    let label = origin.display().to_string();
    match GateSpec::parse(raw, format, origin) {
        Ok(spec) => audit_gate_spec(&spec, contract, &label),
        Err(e) => {
            let mut report = AuditReport::new(Auditor::GateSpec, label.clone());
            report.push(Violation::new(&label, format!("gate spec could not be loaded: {}", e)));
            report
        }
    }
}

/// Read and audit the gate source under a crate root
pub fn audit_gate_source_at(root: &Path, contract: &GateContract) -> AuditReport {
    let thresholds = std::fs::read_to_string(root.join(THRESHOLDS_PATH));
    let aggregate = std::fs::read_to_string(root.join(AGGREGATE_PATH));

    let mut report = match (&thresholds, &aggregate) {
        (Ok(t), Ok(a)) => audit_gate_source(t, a, &GateSpec::builtin(), contract),
        _ => AuditReport::new(Auditor::GateSpec, "gate source"),
    };
    report.target = root.display().to_string();

    for (path, result) in [(THRESHOLDS_PATH, &thresholds), (AGGREGATE_PATH, &aggregate)] {
        if let Err(e) = result {
            report.push(
                Violation::new(path, format!("cannot read audit target: {}", e))
                    .at(root.join(path).display().to_string()),
            );
        }
    }
    report
}

/// Read and audit a gate spec override file
pub fn audit_gate_spec_path(path: &Path, contract: &GateContract) -> AuditReport {
    match std::fs::read_to_string(path) {
        Ok(raw) => audit_gate_spec_file(&raw, SpecFormat::from_path(path), path, contract),
        Err(e) => {
            let label = path.display().to_string();
            let mut report = AuditReport::new(Auditor::GateSpec, label.clone());
            report.push(Violation::new(label, format!("cannot read audit target: {}", e)));
            report
        }
    }
}

/// Built-in threshold values that are weaker than the contract even though the
/// constant they should come from is not
fn compare_builtin_wiring(
    found: &BTreeMap<String, Found>,
    builtin: &GateSpec,
    contract: &GateContract,
    report: &mut AuditReport,
) {
    for (name, value) in builtin.threshold_values() {
        let Some(expected) = contract.thresholds.get(&name) else {
            continue;
        };
        if !expected.bound.is_weaker(value, expected.value) {
            continue;
        }
        // Already reported against the constant
        if found.get(&name).is_some_and(|f| f.value == value) {
            continue;
        }
        report.push(
            Violation::new(&name, "built-in gate spec does not use the threshold constant")
                .expected(format!("{} {}", expected.bound.describe(), expected.value))
                .found(value.to_string())
                .at(SPEC_PATH),
        );
    }
}

/// Built-in voice weights that drifted from the pinned contract table, one
/// violation per feature
fn compare_voice_weights(builtin: &GateSpec, contract: &GateContract, report: &mut AuditReport) {
    let Some(pinned) = &contract.voice_weights else {
        return;
    };
    let (Ok(Value::Object(expected)), Ok(Value::Object(actual))) = (
        serde_json::to_value(pinned),
        serde_json::to_value(&builtin.voice_weights),
    ) else {
        return;
    };
    for (feature, value) in &expected {
        let found = actual.get(feature).cloned().unwrap_or(Value::Null);
        if &found != value {
            report.push(
                Violation::new(
                    format!("voice_weights.{}", feature),
                    "built-in voice weight differs from the contract",
                )
                .expected(value.to_string())
                .found(found.to_string())
                .at(SPEC_PATH),
            );
        }
    }
}

fn compare_severities(
    spec: &GateSpec,
    contract: &GateContract,
    target: &str,
    report: &mut AuditReport,
) {
    for (check, content_types) in &contract.required_checks {
        for content_type in content_types {
            if spec.severity(*content_type, *check).is_none() {
                report.push(
                    Violation::new(
                        check.as_str(),
                        format!("mandated check does not run for {} documents", content_type),
                    )
                    .expected(format!("severity entry for ({}, {})", content_type, check))
                    .found("none")
                    .at(target),
                );
            }
        }
    }

    for (check, content_types) in &contract.critical_checks {
        for content_type in content_types {
            if let Some(Severity::Warning) = spec.severity(*content_type, *check) {
                report.push(
                    Violation::new(
                        check.as_str(),
                        format!("check downgraded to warning for {} documents", content_type),
                    )
                    .expected("critical")
                    .found("warning")
                    .at(target),
                );
            }
        }
    }
}

fn compare_thresholds(
    found: &BTreeMap<String, Found>,
    contract: &GateContract,
    target: &str,
    report: &mut AuditReport,
) {
    for (name, expected) in &contract.thresholds {
        let bound = format!("{} {}", expected.bound.describe(), expected.value);
        match found.get(name) {
            None => report.push(
                Violation::new(name, "threshold definition not found")
                    .expected(bound)
                    .found("missing")
                    .at(target),
            ),
            Some(f) if expected.bound.is_weaker(f.value, expected.value) => {
                let location = f.location.clone().unwrap_or_else(|| target.to_string());
                report.push(
                    Violation::new(name, "threshold weakened relative to the contract")
                        .expected(bound)
                        .found(f.value.to_string())
                        .at(location),
                );
            }
            Some(f) if f.value != expected.value => {
                tracing::info!(
                    "{} tightened to {} (contract {})",
                    name,
                    f.value,
                    expected.value
                );
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;
    use crate::gate::CheckName;

    const THRESHOLDS: &str = include_str!("../gate/thresholds.rs");
    const AGGREGATE: &str = include_str!("../gate/aggregate.rs");

    fn contract() -> GateContract {
        GateContract::builtin().unwrap()
    }

    #[test]
    fn test_shipped_source_is_clean() {
        let report = audit_gate_source(THRESHOLDS, AGGREGATE, &GateSpec::builtin(), &contract());
        assert!(report.is_clean(), "{:?}", report.violations);
    }

    #[test]
    fn test_weakened_constant() {
        let edited = THRESHOLDS.replace(
            "pub const SLOP_CEILING: usize = 2;",
            "pub const SLOP_CEILING: usize = 5;",
        );
        let report = audit_gate_source(&edited, AGGREGATE, &GateSpec::builtin(), &contract());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].subject, "SLOP_CEILING");
        assert_eq!(report.violations[0].found.as_deref(), Some("5"));
    }

    #[test]
    fn test_tightened_constant_is_clean() {
        let edited = THRESHOLDS.replace(
            "pub const MIN_CITATIONS_RESEARCH: usize = 3;",
            "pub const MIN_CITATIONS_RESEARCH: usize = 4;",
        );
        let report = audit_gate_source(&edited, AGGREGATE, &GateSpec::builtin(), &contract());
        assert!(report.is_clean());
    }

    #[test]
    fn test_removed_check_from_order() {
        let edited = AGGREGATE.replace("    CheckName::NullText,\n", "");
        let report = audit_gate_source(THRESHOLDS, &edited, &GateSpec::builtin(), &contract());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].subject, "null_text");
    }

    #[test]
    fn test_missing_check_order() {
        let report = audit_gate_source(
            THRESHOLDS,
            "pub fn nothing() {}",
            &GateSpec::builtin(),
            &contract(),
        );
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].message.contains("single source of truth"));
    }

    #[test]
    fn test_builtin_severity_demotion_is_caught_from_source() {
        let mut builtin = GateSpec::builtin();
        if let Some(row) = builtin.severities.get_mut(&ContentType::Research) {
            row.insert(CheckName::Slop, Severity::Warning);
        }
        let report = audit_gate_source(THRESHOLDS, AGGREGATE, &builtin, &contract());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(report.violations[0].subject, "slop");
        assert_eq!(report.violations[0].location.as_deref(), Some(SPEC_PATH));
    }

    #[test]
    fn test_builtin_dropped_check_is_caught_from_source() {
        let mut builtin = GateSpec::builtin();
        if let Some(row) = builtin.severities.get_mut(&ContentType::Guide) {
            row.remove(&CheckName::GuideSize);
        }
        let report = audit_gate_source(THRESHOLDS, AGGREGATE, &builtin, &contract());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(report.violations[0].subject, "guide_size");
    }

    #[test]
    fn test_builtin_hardcoded_threshold_is_caught_from_source() {
        let mut builtin = GateSpec::builtin();
        builtin.thresholds.slop_ceiling = 5;
        let report = audit_gate_source(THRESHOLDS, AGGREGATE, &builtin, &contract());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(report.violations[0].subject, "SLOP_CEILING");
        assert_eq!(report.violations[0].found.as_deref(), Some("5"));
    }

    #[test]
    fn test_builtin_voice_weight_drift_is_caught_from_source() {
        let mut builtin = GateSpec::builtin();
        builtin.voice_weights.corporate = crate::gate::FeatureWeight::uncapped(0);
        let report = audit_gate_source(THRESHOLDS, AGGREGATE, &builtin, &contract());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(report.violations[0].subject, "voice_weights.corporate");
        assert_eq!(report.violations[0].found.as_deref(), Some(r#"{"weight":0}"#));
    }

    #[test]
    fn test_override_may_retune_voice_weights() {
        let mut spec = GateSpec::builtin();
        spec.voice_weights.number = crate::gate::FeatureWeight::capped(4, 10);
        assert!(audit_gate_spec(&spec, &contract(), "tuned").is_clean());
    }

    #[test]
    fn test_weakened_constant_is_reported_once() {
        let edited = THRESHOLDS.replace(
            "pub const SLOP_CEILING: usize = 2;",
            "pub const SLOP_CEILING: usize = 5;",
        );
        let mut builtin = GateSpec::builtin();
        builtin.thresholds.slop_ceiling = 5;
        let report = audit_gate_source(&edited, AGGREGATE, &builtin, &contract());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
    }

    #[test]
    fn test_builtin_spec_is_clean() {
        let report = audit_gate_spec(&GateSpec::builtin(), &contract(), "builtin");
        assert!(report.is_clean(), "{:?}", report.violations);
    }

    #[test]
    fn test_spec_severity_downgrade_and_removal() {
        let mut spec = GateSpec::builtin();
        if let Some(row) = spec.severities.get_mut(&ContentType::Research) {
            row.insert(CheckName::Citations, Severity::Warning);
        }
        if let Some(row) = spec.severities.get_mut(&ContentType::Brief) {
            row.remove(&CheckName::Placeholder);
        }
        let report = audit_gate_spec(&spec, &contract(), "edited");
        assert_eq!(report.violations.len(), 2);
        assert!(report
            .violations
            .iter()
            .any(|v| v.subject == "citations" && v.found.as_deref() == Some("warning")));
    }

    #[test]
    fn test_unparseable_spec_file_is_violation() {
        let report = audit_gate_spec_file(
            "{ not json",
            SpecFormat::Json,
            Path::new("gate.json"),
            &contract(),
        );
        assert_eq!(report.exit_code(), 1);
    }
}
