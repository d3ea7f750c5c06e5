//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! CLI command implementations, one submodule per command. Each handler
//! returns the process exit code so `main` owns the exit.

pub mod audit;
pub mod batch;
pub mod check;
pub mod manifest;
pub mod output;
pub mod plan;

pub use audit::{execute_audit, AuditOptions, AuditSubcommand};
pub use batch::{execute_batch, BatchOptions};
pub use check::{execute_check, CheckOptions};
pub use manifest::{execute_manifest, ManifestOptions, ManifestView};
pub use output::{print_check, print_report, summarize};
pub use plan::{execute_plan_check, PlanCheckOptions};
