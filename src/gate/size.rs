//! @acp:module "Size Checks"
//! @acp:summary "Guide size bounds and workout coverage"
//! @acp:domain gate
//! @acp:layer logic
//!
//! Guide byte-size bounds and training-plan workout coverage.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::spec::Thresholds;
use super::types::{CheckDetails, CheckName, CheckOutcome, CheckResult, Severity};

/// Extension of scheduled workout files
pub const WORKOUT_EXTENSION: &str = "zwo";

pub fn check_guide_size(bytes: usize, thresholds: &Thresholds) -> CheckOutcome {
    let (min_bytes, max_bytes) = (thresholds.min_guide_bytes, thresholds.max_guide_bytes);
    CheckOutcome {
        passed: (min_bytes..=max_bytes).contains(&bytes),
        details: CheckDetails::Size {
            bytes,
            min_bytes,
            max_bytes,
        },
    }
}

/// Files a plan of `weeks` weeks must ship
pub fn required_workout_files(weeks: u32, per_week: f64) -> usize {
    (weeks as f64 * per_week).ceil().max(0.0) as usize
}

/// Coverage of a training plan's workout files.
///
/// Not part of the document gate: it checks a plan bundle, so it always reports
/// as critical and stands alone.
pub fn check_workout_coverage(
    weeks: u32,
    workout_files: usize,
    thresholds: &Thresholds,
) -> CheckResult {
    let required_files = required_workout_files(weeks, thresholds.min_workout_files_per_week);
    CheckResult {
        name: CheckName::WorkoutCoverage,
        passed: weeks > 0 && workout_files >= required_files,
        severity: Severity::Critical,
        details: CheckDetails::WorkoutCoverage {
            weeks,
            workout_files,
            required_files,
        },
    }
}

/// Workout files under `dir`, sorted for stable output
pub fn find_workout_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(WORKOUT_EXTENSION))
        })
        .collect();
    files.sort();
    files
}
