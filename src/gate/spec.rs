//! @acp:module "Gate Spec"
//! @acp:summary "Versioned gate thresholds, weights and severities"
//! @acp:domain gate
//! @acp:layer config
//!
//! The versioned, read-only table of thresholds, voice weights, section schemas
//! and severities. Built once per process from the constants in
//! [`super::thresholds`] or from a versioned override file, then shared
//! immutably by every check.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::content::ContentType;
use crate::error::{GateError, Result};

use super::thresholds::*;
use super::types::{CheckName, Severity};

/// Complete gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    pub version: String,
    pub thresholds: Thresholds,
    pub voice_weights: VoiceWeights,
    /// Required section headers per content type, in schema order
    pub sections: BTreeMap<ContentType, Vec<String>>,
    /// Which checks run per content type and whether their failure blocks
    pub severities: BTreeMap<ContentType, BTreeMap<CheckName, Severity>>,
}

/// On-disk format of a gate spec override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => SpecFormat::Yaml,
            _ => SpecFormat::Json,
        }
    }
}

/// Numeric thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub slop_ceiling: usize,
    pub min_voice_score: i64,
    pub min_specificity_categories: usize,
    pub min_citations_research: usize,
    pub min_citations_brief: usize,
    pub min_citations_guide: usize,
    pub min_guide_bytes: usize,
    pub max_guide_bytes: usize,
    pub min_workout_files_per_week: f64,
}

impl Thresholds {
    pub fn min_citations(&self, content_type: ContentType) -> usize {
        match content_type {
            ContentType::Research => self.min_citations_research,
            ContentType::Brief => self.min_citations_brief,
            ContentType::Guide => self.min_citations_guide,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            slop_ceiling: SLOP_CEILING,
            min_voice_score: MIN_VOICE_SCORE,
            min_specificity_categories: MIN_SPECIFICITY_CATEGORIES,
            min_citations_research: MIN_CITATIONS_RESEARCH,
            min_citations_brief: MIN_CITATIONS_BRIEF,
            min_citations_guide: MIN_CITATIONS_GUIDE,
            min_guide_bytes: MIN_GUIDE_BYTES,
            max_guide_bytes: MAX_GUIDE_BYTES,
            min_workout_files_per_week: MIN_WORKOUT_FILES_PER_WEEK,
        }
    }
}

/// Weight of one voice feature; `cap` limits how many hits are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub weight: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<usize>,
}

impl FeatureWeight {
    pub const fn capped(weight: i64, cap: usize) -> Self {
        Self {
            weight,
            cap: Some(cap),
        }
    }

    pub const fn uncapped(weight: i64) -> Self {
        Self { weight, cap: None }
    }

    /// Contribution of `hits` occurrences
    pub fn apply(&self, hits: usize) -> i64 {
        let counted = self.cap.map_or(hits, |cap| hits.min(cap));
        let counted = i64::try_from(counted).unwrap_or(i64::MAX);
        self.weight.saturating_mul(counted)
    }
}

/// Voice scoring table.
///
/// Scores are unbounded weighted sums; tuning happens here and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceWeights {
    pub base: i64,
    pub number: FeatureWeight,
    pub blunt_marker: FeatureWeight,
    pub second_person: FeatureWeight,
    pub short_sentence: FeatureWeight,
    pub corporate: FeatureWeight,
    pub passive_hedge: FeatureWeight,
}

impl Default for VoiceWeights {
    fn default() -> Self {
        Self {
            base: 10,
            number: FeatureWeight::capped(3, 10),
            blunt_marker: FeatureWeight::capped(5, 6),
            second_person: FeatureWeight::capped(1, 10),
            short_sentence: FeatureWeight::capped(2, 5),
            corporate: FeatureWeight::uncapped(-10),
            passive_hedge: FeatureWeight::uncapped(-5),
        }
    }
}

impl GateSpec {
    /// Spec built from the compiled-in constants
    pub fn builtin() -> Self {
        let sections = BTreeMap::from([
            (ContentType::Research, to_owned(RESEARCH_SECTIONS)),
            (ContentType::Brief, to_owned(BRIEF_SECTIONS)),
            (ContentType::Guide, to_owned(GUIDE_SECTIONS)),
        ]);

        Self {
            version: GATE_SPEC_VERSION.to_string(),
            thresholds: Thresholds::default(),
            voice_weights: VoiceWeights::default(),
            sections,
            severities: default_severities(),
        }
    }

    /// Load a versioned override file (JSON or YAML by extension).
    ///
    /// The file is validated against the bundled JSON schema before it is
    /// deserialized, and every threshold that differs from the built-in value is
    /// logged so overrides never go unnoticed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let spec = Self::parse(&raw, SpecFormat::from_path(path), path)?;
        tracing::info!("Loaded gate spec version {} from {:?}", spec.version, path);
        Ok(spec)
    }

    /// Parse override text; `origin` is only used in error messages
    pub fn parse(raw: &str, format: SpecFormat, origin: &Path) -> Result<Self> {
        let value: serde_json::Value = match format {
            SpecFormat::Yaml => serde_yaml::from_str(raw)?,
            SpecFormat::Json => serde_json::from_str(raw)?,
        };

        validate_against_schema(origin, &value)?;

        let spec: GateSpec = serde_json::from_value(value)?;
        spec.validate()?;
        spec.log_overrides(&GateSpec::builtin());
        Ok(spec)
    }

    /// Load from an optional override path, falling back to the built-in spec
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Every content type needs a section schema and a severity row that runs
    /// the content check; anything less is a startup-time error.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(GateError::IncompleteSpec("version is empty".to_string()));
        }
        for content_type in ContentType::ALL {
            match self.sections.get(&content_type) {
                Some(headers) if !headers.is_empty() => {}
                _ => {
                    return Err(GateError::IncompleteSpec(format!(
                        "no required sections for {}",
                        content_type
                    )))
                }
            }
            let row = self.severities.get(&content_type).ok_or_else(|| {
                GateError::IncompleteSpec(format!("no severity row for {}", content_type))
            })?;
            if !row.contains_key(&CheckName::Content) {
                return Err(GateError::IncompleteSpec(format!(
                    "severity row for {} does not run the content check",
                    content_type
                )));
            }
        }
        if self.thresholds.min_guide_bytes > self.thresholds.max_guide_bytes {
            return Err(GateError::IncompleteSpec(
                "min_guide_bytes exceeds max_guide_bytes".to_string(),
            ));
        }
        Ok(())
    }

    pub fn severity(&self, content_type: ContentType, check: CheckName) -> Option<Severity> {
        self.severities
            .get(&content_type)
            .and_then(|row| row.get(&check))
            .copied()
    }

    pub fn required_sections(&self, content_type: ContentType) -> &[String] {
        self.sections
            .get(&content_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Threshold values keyed by their constant names in `gate::thresholds`.
    ///
    /// Section tables contribute their header count.
    pub fn threshold_values(&self) -> BTreeMap<String, f64> {
        let t = &self.thresholds;
        let count = |ct: ContentType| self.required_sections(ct).len() as f64;
        BTreeMap::from([
            ("SLOP_CEILING".to_string(), t.slop_ceiling as f64),
            ("MIN_VOICE_SCORE".to_string(), t.min_voice_score as f64),
            (
                "MIN_SPECIFICITY_CATEGORIES".to_string(),
                t.min_specificity_categories as f64,
            ),
            ("MIN_CITATIONS_RESEARCH".to_string(), t.min_citations_research as f64),
            ("MIN_CITATIONS_BRIEF".to_string(), t.min_citations_brief as f64),
            ("MIN_CITATIONS_GUIDE".to_string(), t.min_citations_guide as f64),
            ("MIN_GUIDE_BYTES".to_string(), t.min_guide_bytes as f64),
            ("MAX_GUIDE_BYTES".to_string(), t.max_guide_bytes as f64),
            (
                "MIN_WORKOUT_FILES_PER_WEEK".to_string(),
                t.min_workout_files_per_week,
            ),
            ("RESEARCH_SECTIONS".to_string(), count(ContentType::Research)),
            ("BRIEF_SECTIONS".to_string(), count(ContentType::Brief)),
            ("GUIDE_SECTIONS".to_string(), count(ContentType::Guide)),
        ])
    }

    /// Short content hash of the effective spec, carried in reports
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&bytes);
        format!("{:x}", digest)[..16].to_string()
    }

    fn log_overrides(&self, builtin: &GateSpec) {
        let ours = self.threshold_values();
        for (name, default) in builtin.threshold_values() {
            if let Some(value) = ours.get(&name) {
                if *value != default {
                    tracing::warn!(
                        "Gate spec {} overrides {}: {} (built-in {})",
                        self.version,
                        name,
                        value,
                        default
                    );
                }
            }
        }
        if self.voice_weights != builtin.voice_weights {
            tracing::warn!("Gate spec {} overrides voice weights", self.version);
        }
    }
}

impl Default for GateSpec {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_owned(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| h.to_string()).collect()
}

fn default_severities() -> BTreeMap<ContentType, BTreeMap<CheckName, Severity>> {
    use CheckName::*;
    use Severity::*;

    let research = BTreeMap::from([
        (Content, Critical),
        (Slop, Critical),
        (Voice, Warning),
        (Specificity, Warning),
        (Sections, Critical),
        (Citations, Critical),
        (Placeholder, Critical),
        (NullText, Critical),
    ]);
    let brief = BTreeMap::from([
        (Content, Critical),
        (Slop, Warning),
        (Voice, Warning),
        (Specificity, Warning),
        (Sections, Warning),
        (Citations, Warning),
        (Placeholder, Critical),
        (NullText, Critical),
    ]);
    let mut guide = brief.clone();
    guide.insert(GuideSize, Critical);

    BTreeMap::from([
        (ContentType::Research, research),
        (ContentType::Brief, brief),
        (ContentType::Guide, guide),
    ])
}

fn validate_against_schema(path: &Path, value: &serde_json::Value) -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(include_str!("../../data/gate_spec.schema.json"))?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| GateError::IncompleteSpec(format!("bundled schema is invalid: {}", e)))?;

    let errors: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(GateError::SchemaViolation {
            path: path.to_path_buf(),
            errors,
        })
    }
}
