//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config
//!
//! Project configuration read from `.guidegate.json`. Every field has a
//! default, so an absent file means the built-in gate spec, phrase sets and
//! contract.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::audit::GateContract;
use crate::batch::DEFAULT_PATTERN;
use crate::gate::{AggregateGate, GateSpec};
use crate::manifest::ManifestTable;
use crate::phrases::PhraseSets;

pub const DEFAULT_CONFIG_PATH: &str = ".guidegate.json";

fn default_config_schema() -> String {
    "https://guidegate.dev/schemas/v1/config.schema.json".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "$schema", default = "default_config_schema")]
    pub schema: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Versioned gate spec override (JSON or YAML)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_spec: Option<PathBuf>,

    /// Phrase set override (JSON or YAML)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrase_sets: Option<PathBuf>,

    /// Threshold contract; the bundled one when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<PathBuf>,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Document patterns (glob syntax, relative to the batch root)
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            workers: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Crate root holding the audited sources
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec![DEFAULT_PATTERN.to_string()]
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: default_config_schema(),
            version: default_version(),
            gate_spec: None,
            phrase_sets: None,
            contract: None,
            batch: BatchConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the file if it exists, otherwise defaults. A file that exists but
    /// does not parse is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Build the gate from the configured spec and phrase overrides
    pub fn build_gate(&self) -> anyhow::Result<AggregateGate> {
        let spec = GateSpec::load_or_builtin(self.gate_spec.as_deref())
            .context("Failed to load gate spec")?;
        let phrases = PhraseSets::load_or_builtin(self.phrase_sets.as_deref())
            .context("Failed to load phrase sets")?;
        Ok(AggregateGate::new(Arc::new(spec), Arc::new(phrases))?)
    }

    /// Section table for the configured spec, so manifests plan the headers
    /// the gate will check
    pub fn build_manifest_table(&self) -> anyhow::Result<ManifestTable> {
        let spec = GateSpec::load_or_builtin(self.gate_spec.as_deref())
            .context("Failed to load gate spec")?;
        Ok(ManifestTable::from_spec(&spec))
    }

    pub fn load_contract(&self) -> anyhow::Result<GateContract> {
        GateContract::load_or_builtin(self.contract.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join(DEFAULT_CONFIG_PATH)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.batch.include, vec!["**/*.md"]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);
        std::fs::write(&path, r#"{"batch": {"workers": 4}, "audit": {"root": "crates/gate"}}"#)
            .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.batch.workers, Some(4));
        assert_eq!(config.batch.include, vec!["**/*.md"]);
        assert_eq!(config.audit.root, PathBuf::from("crates/gate"));
        assert!(config.gate_spec.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);
        let config = Config {
            contract: Some(PathBuf::from("contracts/gate_thresholds.json")),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);
        std::fs::write(&path, "{ nope").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_manifest_table_follows_configured_spec() {
        let dir = tempfile::tempdir().unwrap();
        let spec_path = dir.path().join("gate.yaml");
        let mut spec = GateSpec::builtin();
        spec.sections.insert(ContentType::Research, vec!["## SUMMARY".to_string()]);
        std::fs::write(&spec_path, serde_yaml::to_string(&spec).unwrap()).unwrap();

        let config = Config {
            gate_spec: Some(spec_path),
            ..Default::default()
        };
        let table = config.build_manifest_table().unwrap();
        assert_eq!(table.mandatory(ContentType::Research).len(), 1);
        assert_eq!(table.mandatory(ContentType::Research)[0].title, "SUMMARY");
    }

    #[test]
    fn test_build_gate_from_defaults() {
        let gate = Config::default().build_gate().unwrap();
        assert_eq!(gate.spec(), &GateSpec::builtin());
    }
}
