//! @acp:module "Error Types"
//! @acp:summary "Library error types"
//! @acp:domain gate
//! @acp:layer types
//!
//! Library-level error enum shared by the gate, manifest and audit modules.
//! Command handlers wrap these in `anyhow` with context.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced at the crate boundary.
///
/// Check logic itself never returns these: every check is total over text.
/// They come from loading configuration, parsing profiles, and rendering.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("{path} does not match the gate spec schema: {errors:?}")]
    SchemaViolation { path: PathBuf, errors: Vec<String> },

    #[error("Gate spec is incomplete: {0}")]
    IncompleteSpec(String),

    #[error("Unknown content type '{0}' (expected research, brief or guide)")]
    UnknownContentType(String),

    #[error("Invalid athlete profile: {0}")]
    InvalidProfile(String),

    #[error("Table of contents and body disagree:\n{diff}")]
    ManifestDrift { diff: String },
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, GateError>;
