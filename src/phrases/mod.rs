//! @acp:module "Phrase Sets"
//! @acp:summary "Versioned phrase tables"
//! @acp:domain gate
//! @acp:layer data
//!
//! Versioned tables of filler phrases, hedge combinations, voice indicators,
//! template residue and source host rules. Pure data: the built-in table is
//! embedded at compile time and an override file replaces it wholesale.

pub mod matcher;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use matcher::{PhraseCategory, PhraseMatch, PhraseMatcher};

/// Complete phrase table set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseSets {
    pub version: String,
    pub slop: SlopPhrases,
    pub voice: VoicePhrases,
    pub hygiene: HygienePhrases,
    pub source_categories: SourceCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopPhrases {
    pub filler: Vec<String>,
    pub hedge: Vec<String>,
    pub enthusiasm: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoicePhrases {
    pub blunt_markers: Vec<String>,
    pub corporate: Vec<String>,
    pub passive_hedges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HygienePhrases {
    pub placeholders: Vec<String>,
    pub null_tokens: Vec<String>,
}

/// Host rules per citation category.
///
/// Rule forms: `.suffix`, `prefix.`, `domain.tld` (exact host or any subdomain),
/// or a bare keyword matched anywhere in the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCategories {
    pub forum: Vec<String>,
    pub video: Vec<String>,
    pub social: Vec<String>,
    pub official: Vec<String>,
}

impl PhraseSets {
    /// Load the built-in tables
    pub fn builtin() -> Result<Self> {
        let json = include_str!("../../data/phrase_sets.json");
        let sets: PhraseSets =
            serde_json::from_str(json).context("Failed to parse built-in phrase_sets.json")?;
        sets.validate()?;
        Ok(sets)
    }

    /// Load a replacement table from disk (JSON or YAML by extension)
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read phrase sets from {:?}", path))?;
        let sets: PhraseSets = if is_yaml(path) {
            serde_yaml::from_str(&raw)
                .with_context(|| format!("Failed to parse phrase sets from {:?}", path))?
        } else {
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse phrase sets from {:?}", path))?
        };
        sets.validate()
            .with_context(|| format!("Phrase sets in {:?} are incomplete", path))?;
        tracing::info!("Loaded phrase sets version {} from {:?}", sets.version, path);
        Ok(sets)
    }

    /// Load from an optional override path, falling back to the built-in tables
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Reject tables that would make a check vacuous
    fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            anyhow::bail!("phrase sets must carry a version");
        }
        let required: [(&str, &Vec<String>); 5] = [
            ("slop.filler", &self.slop.filler),
            ("slop.hedge", &self.slop.hedge),
            ("slop.enthusiasm", &self.slop.enthusiasm),
            ("hygiene.placeholders", &self.hygiene.placeholders),
            ("hygiene.null_tokens", &self.hygiene.null_tokens),
        ];
        for (name, list) in required {
            if list.is_empty() {
                anyhow::bail!("phrase table '{}' is empty", name);
            }
        }
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
