//! Integrity audit integration tests
//!
//! Audits run against copies of the crate's own gate and manifest sources in a
//! temporary tree, so each test can tamper with exactly one thing.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use guidegate::audit::gate_spec::{AGGREGATE_PATH, SPEC_PATH, THRESHOLDS_PATH};
use guidegate::audit::triggers::{BUILDER_PATH, EVALUATOR_PATH};
use guidegate::audit::{
    audit_gate_source, audit_gate_source_at, audit_gate_spec_path, audit_trigger_isolation_at,
    GateContract,
};
use guidegate::{CheckName, ContentType, GateSpec, Severity};

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Copy the audited sources into a fresh tree, applying `edit` to one of them
fn source_tree(edit: Option<(&str, &str, &str)>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for rel in [THRESHOLDS_PATH, AGGREGATE_PATH, BUILDER_PATH, EVALUATOR_PATH] {
        let mut src = fs::read_to_string(crate_root().join(rel)).unwrap();
        if let Some((target, from, to)) = edit {
            if target == rel {
                assert!(src.contains(from), "{} does not contain {:?}", rel, from);
                src = src.replace(from, to);
            }
        }
        let dest = dir.path().join(rel);
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(dest, src).unwrap();
    }
    dir
}

fn contract() -> GateContract {
    GateContract::builtin().unwrap()
}

fn write_spec(dir: &Path, name: &str, spec: &GateSpec) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(spec).unwrap()).unwrap();
    path
}

// =============================================================================
// Gate spec audit
// =============================================================================

mod gate_spec_audit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_crate_sources_are_clean() {
        let report = audit_gate_source_at(&crate_root(), &contract());
        assert!(report.is_clean(), "{:?}", report.violations);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_weakened_voice_threshold() {
        let tree = source_tree(Some((
            THRESHOLDS_PATH,
            "pub const MIN_VOICE_SCORE: i64 = 40;",
            "pub const MIN_VOICE_SCORE: i64 = 30;",
        )));
        let report = audit_gate_source_at(tree.path(), &contract());

        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(report.violations[0].subject, "MIN_VOICE_SCORE");
        assert_eq!(report.violations[0].found.as_deref(), Some("30"));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_raised_size_ceiling_is_weakening() {
        let tree = source_tree(Some((
            THRESHOLDS_PATH,
            "pub const MAX_GUIDE_BYTES: usize = 500_000;",
            "pub const MAX_GUIDE_BYTES: usize = 900_000;",
        )));
        let report = audit_gate_source_at(tree.path(), &contract());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(report.violations[0].subject, "MAX_GUIDE_BYTES");
    }

    #[test]
    fn test_check_commented_out_of_order() {
        let tree = source_tree(Some((
            AGGREGATE_PATH,
            "\n    CheckName::Placeholder,\n",
            "\n    // CheckName::Placeholder,\n",
        )));
        let report = audit_gate_source_at(tree.path(), &contract());
        assert!(!report.is_clean());
        assert!(report
            .violations
            .iter()
            .all(|v| v.subject == "placeholder"));
    }

    #[test]
    fn test_demoted_research_slop_in_builtin_spec() {
        let thresholds = fs::read_to_string(crate_root().join(THRESHOLDS_PATH)).unwrap();
        let aggregate = fs::read_to_string(crate_root().join(AGGREGATE_PATH)).unwrap();
        let mut builtin = GateSpec::builtin();
        builtin
            .severities
            .get_mut(&ContentType::Research)
            .unwrap()
            .insert(CheckName::Slop, Severity::Warning);

        let report = audit_gate_source(&thresholds, &aggregate, &builtin, &contract());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        let violation = &report.violations[0];
        assert_eq!(violation.subject, "slop");
        assert_eq!(violation.found.as_deref(), Some("warning"));
        assert_eq!(violation.location.as_deref(), Some(SPEC_PATH));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_missing_thresholds_file() {
        let tree = source_tree(None);
        fs::remove_file(tree.path().join(THRESHOLDS_PATH)).unwrap();

        let report = audit_gate_source_at(tree.path(), &contract());
        assert_eq!(report.exit_code(), 1);
        assert!(report
            .violations
            .iter()
            .any(|v| v.message.contains("cannot read audit target")));
    }
}

// =============================================================================
// Spec file audit
// =============================================================================

mod spec_file_audit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_spec_file_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_spec(dir.path(), "gate.json", &GateSpec::builtin());
        let report = audit_gate_spec_path(&path, &contract());
        assert!(report.is_clean(), "{:?}", report.violations);
    }

    #[test]
    fn test_weakened_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut spec = GateSpec::builtin();
        spec.thresholds.min_voice_score = 30;
        let path = write_spec(dir.path(), "gate.json", &spec);

        let report = audit_gate_spec_path(&path, &contract());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_unparseable_or_missing_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("gate.json");
        fs::write(&broken, "{ not json").unwrap();

        assert_eq!(audit_gate_spec_path(&broken, &contract()).exit_code(), 1);
        assert_eq!(
            audit_gate_spec_path(&dir.path().join("absent.json"), &contract()).exit_code(),
            1
        );
    }
}

// =============================================================================
// Trigger isolation audit
// =============================================================================

mod trigger_audit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_crate_sources_are_clean() {
        let report = audit_trigger_isolation_at(&crate_root());
        assert!(report.is_clean(), "{:?}", report.violations);
    }

    #[test]
    fn test_duplicated_altitude_check_in_body_builder() {
        let tree = source_tree(Some((
            BUILDER_PATH,
            "pub fn build_body(content_type: ContentType, triggers: &TriggerSet) -> BodyPlan {\n",
            "pub fn build_body(content_type: ContentType, triggers: &TriggerSet) -> BodyPlan {\n    let high = home_elevation > 5000.0;\n",
        )));
        let report = audit_trigger_isolation_at(tree.path());

        assert_eq!(report.exit_code(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.subject, "build_body");
        assert!(violation.message.contains("duplicated trigger logic"));
        assert!(violation
            .location
            .as_deref()
            .unwrap()
            .starts_with("src/manifest/builder.rs:"));
    }

    #[test]
    fn test_missing_evaluator_file() {
        let tree = source_tree(None);
        fs::remove_file(tree.path().join(EVALUATOR_PATH)).unwrap();

        let report = audit_trigger_isolation_at(tree.path());
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(report.exit_code(), 1);
    }
}
