//! @acp:module "Threshold Contract"
//! @acp:summary "Threshold contract loading and bound comparison"
//! @acp:domain audit
//! @acp:layer config
//!
//! The checked-in record of what the gate must enforce. Auditors compare the
//! live threshold definitions against it; only weakening is a violation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::content::ContentType;
use crate::gate::{CheckName, VoiceWeights};

const BUILTIN_CONTRACT: &str = include_str!("../../contracts/gate_thresholds.json");

/// Direction in which a threshold gets weaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    /// Lowering the value weakens the gate
    Floor,
    /// Raising the value weakens the gate
    Ceiling,
}

impl Bound {
    pub fn is_weaker(&self, found: f64, expected: f64) -> bool {
        match self {
            Bound::Floor => found < expected,
            Bound::Ceiling => found > expected,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Bound::Floor => "at least",
            Bound::Ceiling => "at most",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdContract {
    pub value: f64,
    pub bound: Bound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateContract {
    pub version: String,
    pub thresholds: BTreeMap<String, ThresholdContract>,
    /// Checks that must run, and for which content types
    pub required_checks: BTreeMap<CheckName, Vec<ContentType>>,
    /// Checks whose failure must block publication
    #[serde(default)]
    pub critical_checks: BTreeMap<CheckName, Vec<ContentType>>,
    /// Pinned voice weights for the built-in spec. Overrides may retune them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_weights: Option<VoiceWeights>,
}

impl GateContract {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CONTRACT).context("Built-in threshold contract is malformed")
    }

    /// Load a contract file. Unlike audit targets, a bad contract is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read contract {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Malformed contract {}", path.display()))
    }

    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let contract: Self = serde_json::from_str(raw)?;
        if contract.thresholds.is_empty() {
            bail!("contract {} lists no thresholds", contract.version);
        }
        if let Some((name, _)) = contract.thresholds.iter().find(|(_, t)| !t.value.is_finite()) {
            bail!("contract threshold {} is not a finite number", name);
        }
        Ok(contract)
    }
}
