//! @acp:module "Manifest Table"
//! @acp:summary "Mandatory and trigger-gated section layout"
//! @acp:domain manifest
//! @acp:layer model
//!
//! Declarative section layout: mandatory sections per content type plus the
//! trigger-gated optional blocks. Mandatory sections come from a gate spec's
//! section tables, the same ones the section-completeness check enforces. The
//! shared table is built from the built-in spec; a table built with
//! [`ManifestTable::from_spec`] follows an override.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::content::ContentType;
use crate::gate::GateSpec;
use crate::trigger::{Trigger, TriggerSet};

/// Stable identifier of a planned section
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Slug derived from a header: `## Race Overview` becomes `race-overview`
    pub fn from_title(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len());
        for c in title.trim_start_matches('#').trim().chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        Self(slug.trim_matches('-').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the manifest table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub id: SectionId,
    pub title: String,
    /// `None` for mandatory sections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

impl SectionEntry {
    fn mandatory(header: &str) -> Self {
        Self {
            id: SectionId::from_title(header),
            title: header.trim_start_matches('#').trim().to_string(),
            trigger: None,
        }
    }

    fn optional(trigger: Trigger, title: &str) -> Self {
        Self {
            id: SectionId::from_title(title),
            title: title.to_string(),
            trigger: Some(trigger),
        }
    }

    pub fn is_optional(&self) -> bool {
        self.trigger.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ManifestTable {
    mandatory: BTreeMap<ContentType, Vec<SectionEntry>>,
    optional: BTreeMap<ContentType, Vec<SectionEntry>>,
}

static BUILTIN_TABLE: LazyLock<ManifestTable> = LazyLock::new(ManifestTable::builtin);

/// Shared table for the built-in gate spec
pub fn manifest_table() -> &'static ManifestTable {
    &BUILTIN_TABLE
}

impl ManifestTable {
    pub fn builtin() -> Self {
        Self::from_spec(&GateSpec::builtin())
    }

    /// Mandatory sections from the spec's section tables, in schema order
    pub fn from_spec(spec: &GateSpec) -> Self {
        let mandatory = ContentType::ALL
            .into_iter()
            .map(|ct| {
                let entries = spec
                    .required_sections(ct)
                    .iter()
                    .map(|h| SectionEntry::mandatory(h))
                    .collect();
                (ct, entries)
            })
            .collect();

        // Appended in this order after the mandatory guide sections
        let mut optional = BTreeMap::new();
        optional.insert(
            ContentType::Guide,
            vec![
                SectionEntry::optional(Trigger::Altitude, "High-Altitude Considerations"),
                SectionEntry::optional(Trigger::WomenSpecific, "Women-Specific Considerations"),
                SectionEntry::optional(Trigger::Masters, "Masters Athlete Considerations"),
            ],
        );

        Self {
            mandatory,
            optional,
        }
    }

    pub fn mandatory(&self, content_type: ContentType) -> &[SectionEntry] {
        self.mandatory
            .get(&content_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn optional(&self, content_type: ContentType) -> &[SectionEntry] {
        self.optional
            .get(&content_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mandatory sections followed by the optional blocks whose trigger is active
    pub fn sections_for(
        &self,
        content_type: ContentType,
        triggers: &TriggerSet,
    ) -> Vec<&SectionEntry> {
        self.mandatory(content_type)
            .iter()
            .chain(
                self.optional(content_type)
                    .iter()
                    .filter(|e| e.trigger.is_some_and(|t| triggers.is_active(t))),
            )
            .collect()
    }
}
