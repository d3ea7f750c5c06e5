//! @acp:module "Plan Check Command"
//! @acp:summary "Check training plan workout coverage"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Check that a training plan directory carries enough workout files.

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::config::Config;
use crate::gate::{check_workout_coverage, find_workout_files};

use super::output::print_check;

/// Options for the plan-check command
#[derive(Debug, Clone)]
pub struct PlanCheckOptions {
    pub dir: PathBuf,
    pub weeks: u32,
    pub json: bool,
}

/// Execute the plan-check command. Returns the process exit code.
pub fn execute_plan_check(options: PlanCheckOptions, config: &Config) -> Result<i32> {
    if !options.dir.is_dir() {
        bail!("Plan directory not found: {}", options.dir.display());
    }
    let gate = config.build_gate()?;
    let files = find_workout_files(&options.dir);
    let result = check_workout_coverage(options.weeks, files.len(), &gate.spec().thresholds);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{} {}", style("→").cyan(), options.dir.display());
        print_check(&result);
    }

    Ok(if result.passed { 0 } else { 1 })
}
