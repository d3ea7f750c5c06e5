//! @acp:module "Check Command"
//! @acp:summary "Run the content gate over one document"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Run the content gate over a single document.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::config::Config;
use crate::content::{ContentDocument, ContentType};

use super::output::print_report;

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Document to check
    pub file: PathBuf,
    /// Content type; inferred from the file name when absent
    pub content_type: Option<ContentType>,
    pub json: bool,
}

/// Execute the check command. Returns the process exit code.
pub fn execute_check(options: CheckOptions, config: &Config) -> Result<i32> {
    let content_type = options
        .content_type
        .or_else(|| ContentType::infer_from_path(&options.file))
        .ok_or_else(|| {
            anyhow!(
                "Cannot infer content type of {}; pass --type research|brief|guide",
                options.file.display()
            )
        })?;

    let gate = config.build_gate()?;
    let document = ContentDocument::read_or_empty(&options.file, content_type);
    let report = gate.evaluate(&document);

    if options.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&options.file.display().to_string(), &report);
    }

    Ok(if report.overall_passed() { 0 } else { 1 })
}
