//! @acp:module "Audit Command"
//! @acp:summary "Run integrity audits with exit codes"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Run the integrity audits as a pre-publish gate.

use std::path::PathBuf;

use anyhow::Result;

use crate::audit::{
    audit_gate_source_at, audit_gate_spec_path, audit_trigger_isolation_at, AuditReport,
    GateContract,
};
use crate::config::Config;

/// Which audit to run
#[derive(Debug, Clone)]
pub enum AuditSubcommand {
    /// Thresholds against the contract, from source or an override file
    GateSpec {
        /// Crate root to scan; defaults to the configured audit root
        source: Option<PathBuf>,
        /// Gate spec override file to audit instead of source
        spec_file: Option<PathBuf>,
    },
    /// Manifest entry points against the trigger evaluator
    Triggers { root: Option<PathBuf> },
    /// Every audit over the configured root, plus the configured spec override
    All,
}

/// Options for the audit command
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub subcommand: AuditSubcommand,
    /// Contract file overriding the configured one
    pub contract: Option<PathBuf>,
    pub json: bool,
}

/// Execute the audit command. Returns the process exit code.
pub fn execute_audit(options: AuditOptions, config: &Config) -> Result<i32> {
    let contract = match &options.contract {
        Some(path) => GateContract::load(path)?,
        None => config.load_contract()?,
    };
    let root = config.audit.root.clone();

    let reports = match options.subcommand {
        AuditSubcommand::GateSpec { source, spec_file } => match spec_file {
            Some(path) => vec![audit_gate_spec_path(&path, &contract)],
            None => vec![audit_gate_source_at(&source.unwrap_or(root), &contract)],
        },
        AuditSubcommand::Triggers { root: target } => {
            vec![audit_trigger_isolation_at(&target.unwrap_or(root))]
        }
        AuditSubcommand::All => {
            let mut reports = vec![
                audit_gate_source_at(&root, &contract),
                audit_trigger_isolation_at(&root),
            ];
            if let Some(spec) = &config.gate_spec {
                reports.push(audit_gate_spec_path(spec, &contract));
            }
            reports
        }
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        reports.iter().for_each(AuditReport::print);
    }

    let violations: usize = reports.iter().map(|r| r.violations.len()).sum();
    tracing::info!("{} audit(s), {} violation(s)", reports.len(), violations);
    Ok(reports.iter().map(AuditReport::exit_code).max().unwrap_or(0))
}
