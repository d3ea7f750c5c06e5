//! @acp:module "Batch Validation"
//! @acp:summary "Parallel gate validation over document trees"
//! @acp:domain gate
//! @acp:layer service
//!
//! Runs the gate over every matching document under a directory. Documents are
//! evaluated in parallel against one shared gate; results are sorted by path so
//! output does not depend on scheduling.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::content::{ContentDocument, ContentType};
use crate::gate::{AggregateGate, GateReport};

pub const DEFAULT_PATTERN: &str = "**/*.md";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Glob patterns relative to the root
    pub patterns: Vec<String>,
    /// Force one content type instead of inferring it from file names
    pub content_type: Option<ContentType>,
    /// Worker threads; `None` uses rayon's default
    pub workers: Option<usize>,
    pub show_progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            patterns: vec![DEFAULT_PATTERN.to_string()],
            content_type: None,
            workers: None,
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub report: GateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub root: PathBuf,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<BatchEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl BatchSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.results.iter().filter(|e| !e.report.overall_passed())
    }
}

/// Files under `root` matching any pattern, sorted
pub fn find_documents(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let compiled = patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid glob pattern: {}", p)))
        .collect::<Result<Vec<_>>>()?;
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let relative = e.path().strip_prefix(root).unwrap_or(e.path());
            let relative = relative.to_string_lossy();
            compiled.iter().any(|p| p.matches_with(&relative, options))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// Validate every matching document under `root`
pub fn run_batch(
    gate: &AggregateGate,
    root: &Path,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let files = find_documents(root, &options.patterns)?;
    tracing::info!("Validating {} document(s) under {}", files.len(), root.display());

    let mut skipped = Vec::new();
    let mut jobs = Vec::with_capacity(files.len());
    for path in files {
        match options.content_type.or_else(|| ContentType::infer_from_path(&path)) {
            Some(content_type) => jobs.push((path, content_type)),
            None => {
                tracing::warn!("Skipping {}: cannot infer content type", path.display());
                skipped.push(SkippedFile {
                    path,
                    reason: "content type not given and not inferable from file name".to_string(),
                });
            }
        }
    }

    let progress = if options.show_progress {
        let bar = ProgressBar::new(jobs.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let evaluate = || -> Vec<BatchEntry> {
        jobs.par_iter()
            .map(|(path, content_type)| {
                let document = ContentDocument::read_or_empty(path, *content_type);
                let report = gate.evaluate(&document);
                progress.inc(1);
                BatchEntry {
                    path: path.clone(),
                    report,
                }
            })
            .collect()
    };

    let mut results = match options.workers {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("Failed to build worker pool")?
            .install(evaluate),
        None => evaluate(),
    };
    progress.finish_and_clear();

    results.sort_by(|a, b| a.path.cmp(&b.path));
    let passed = results.iter().filter(|e| e.report.overall_passed()).count();

    Ok(BatchSummary {
        root: root.to_path_buf(),
        total: results.len(),
        passed,
        failed: results.len() - passed,
        results,
        skipped,
    })
}
