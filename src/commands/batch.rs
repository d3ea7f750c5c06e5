//! @acp:module "Batch Command"
//! @acp:summary "Validate a document tree in parallel"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Validate every matching document under a directory in parallel.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::batch::{run_batch, BatchOptions as RunOptions};
use crate::config::Config;
use crate::content::ContentType;

use super::output::print_report;

/// Options for the batch command
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub root: PathBuf,
    /// Overrides the configured include patterns when non-empty
    pub patterns: Vec<String>,
    pub content_type: Option<ContentType>,
    pub json: bool,
    /// Overrides the configured worker count
    pub workers: Option<usize>,
}

/// Execute the batch command. Returns the process exit code.
pub fn execute_batch(options: BatchOptions, config: &Config) -> Result<i32> {
    let gate = config.build_gate()?;
    let run_options = RunOptions {
        patterns: if options.patterns.is_empty() {
            config.batch.include.clone()
        } else {
            options.patterns.clone()
        },
        content_type: options.content_type,
        workers: options.workers.or(config.batch.workers),
        show_progress: !options.json,
    };

    let summary = run_batch(&gate, &options.root, &run_options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for entry in summary.failures() {
            print_report(&entry.path.display().to_string(), &entry.report);
        }
        for skipped in &summary.skipped {
            println!(
                "{} {} skipped: {}",
                style("⚠").yellow(),
                skipped.path.display(),
                skipped.reason
            );
        }
        let mark = if summary.all_passed() {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "{} {} document(s): {} passed, {} failed",
            mark, summary.total, summary.passed, summary.failed
        );
    }

    Ok(if summary.all_passed() { 0 } else { 1 })
}
