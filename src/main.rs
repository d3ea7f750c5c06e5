#![forbid(unsafe_code)]
//! guidegate command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use guidegate::commands::{
    execute_audit, execute_batch, execute_check, execute_manifest, execute_plan_check,
    AuditOptions, AuditSubcommand, BatchOptions, CheckOptions, ManifestOptions, ManifestView,
    PlanCheckOptions,
};
use guidegate::config::DEFAULT_CONFIG_PATH;
use guidegate::{Config, ContentType};

#[derive(Parser)]
#[command(name = "guidegate")]
#[command(about = "Deterministic quality gate for generated race content")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the content gate over one document
    Check {
        /// Document to check
        file: PathBuf,

        /// Content type (research, brief, guide); inferred from the file name if omitted
        #[arg(short = 't', long = "type")]
        content_type: Option<ContentType>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate every matching document under a directory
    Batch {
        /// Directory to scan
        root: PathBuf,

        /// Glob pattern relative to the root (repeatable)
        #[arg(short, long = "pattern")]
        patterns: Vec<String>,

        /// Force one content type for every document
        #[arg(short = 't', long = "type")]
        content_type: Option<ContentType>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Worker threads
        #[arg(short = 'j', long)]
        workers: Option<usize>,
    },

    /// Build the section manifest for an athlete profile
    Manifest {
        /// Content type (research, brief, guide)
        #[arg(short = 't', long = "type")]
        content_type: ContentType,

        /// Athlete profile (JSON or YAML)
        #[arg(short, long)]
        profile: PathBuf,

        /// toc, body or both
        #[arg(long, default_value = "both")]
        view: ManifestView,

        /// Render markdown
        #[arg(long)]
        render: bool,

        /// Title for rendered output
        #[arg(long)]
        title: Option<String>,

        /// Print the manifest as JSON
        #[arg(long)]
        json: bool,

        /// Fail when the TOC and body disagree
        #[arg(long)]
        verify: bool,
    },

    /// Integrity audits
    Audit {
        #[command(subcommand)]
        target: AuditCommands,

        /// Threshold contract file
        #[arg(long, global = true)]
        contract: Option<PathBuf>,

        /// Print reports as JSON
        #[arg(long, global = true)]
        json: bool,
    },

    /// Check a training plan's workout coverage
    PlanCheck {
        /// Plan directory holding workout files
        dir: PathBuf,

        /// Plan length in weeks
        #[arg(short, long)]
        weeks: u32,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum AuditCommands {
    /// Thresholds and mandated checks against the contract
    GateSpec {
        /// Crate root whose gate source is scanned
        #[arg(long, conflicts_with = "spec_file")]
        source: Option<PathBuf>,

        /// Gate spec override file to audit instead of source
        #[arg(long)]
        spec_file: Option<PathBuf>,
    },

    /// Manifest entry points must delegate to the trigger evaluator
    Triggers {
        /// Crate root to scan
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Run every audit
    All,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::load_or_default(&cli.config)?;

    let exit_code = match cli.command {
        Commands::Check {
            file,
            content_type,
            json,
        } => execute_check(
            CheckOptions {
                file,
                content_type,
                json,
            },
            &config,
        )?,

        Commands::Batch {
            root,
            patterns,
            content_type,
            json,
            workers,
        } => execute_batch(
            BatchOptions {
                root,
                patterns,
                content_type,
                json,
                workers,
            },
            &config,
        )?,

        Commands::Manifest {
            content_type,
            profile,
            view,
            render,
            title,
            json,
            verify,
        } => execute_manifest(
            ManifestOptions {
                content_type,
                profile,
                view,
                render,
                title,
                json,
                verify,
            },
            &config,
        )?,

        Commands::Audit {
            target,
            contract,
            json,
        } => {
            let subcommand = match target {
                AuditCommands::GateSpec { source, spec_file } => {
                    AuditSubcommand::GateSpec { source, spec_file }
                }
                AuditCommands::Triggers { root } => AuditSubcommand::Triggers { root },
                AuditCommands::All => AuditSubcommand::All,
            };
            execute_audit(
                AuditOptions {
                    subcommand,
                    contract,
                    json,
                },
                &config,
            )?
        }

        Commands::PlanCheck { dir, weeks, json } => {
            execute_plan_check(PlanCheckOptions { dir, weeks, json }, &config)?
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
