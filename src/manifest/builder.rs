//! @acp:module "Section Manifest Builder"
//! @acp:summary "Table of contents and body plans from evaluated triggers"
//! @acp:domain manifest
//! @acp:layer logic
//!
//! Builds the table of contents and the body plan for a document. Both entry
//! points take a [`TriggerSet`] and nothing else about the athlete, so the TOC
//! and the body are derived from the same evaluated flags and cannot drift.
//! The `_with` variants plan against a table built from an override gate spec.

use serde::Serialize;
use similar::TextDiff;

use crate::content::ContentType;
use crate::error::{GateError, Result};
use crate::trigger::{self, AthleteProfile, Trigger, TriggerSet};

use super::table::{manifest_table, ManifestTable, SectionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub number: usize,
    pub id: SectionId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOfContents {
    content_type: ContentType,
    entries: Vec<TocEntry>,
}

impl TableOfContents {
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn section_ids(&self) -> Vec<&SectionId> {
        self.entries.iter().map(|e| &e.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodySection {
    pub id: SectionId,
    /// Markdown header the writer must emit
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyPlan {
    content_type: ContentType,
    sections: Vec<BodySection>,
}

impl BodyPlan {
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn sections(&self) -> &[BodySection] {
        &self.sections
    }

    pub fn section_ids(&self) -> Vec<&SectionId> {
        self.sections.iter().map(|s| &s.id).collect()
    }
}

/// Build the table of contents from evaluated triggers
pub fn build_toc(content_type: ContentType, triggers: &TriggerSet) -> TableOfContents {
    build_toc_with(manifest_table(), content_type, triggers)
}

pub fn build_toc_with(
    table: &ManifestTable,
    content_type: ContentType,
    triggers: &TriggerSet,
) -> TableOfContents {
    let entries = table
        .sections_for(content_type, triggers)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| TocEntry {
            number: i + 1,
            id: entry.id.clone(),
            title: entry.title.clone(),
        })
        .collect();

    TableOfContents {
        content_type,
        entries,
    }
}

/// Build the body plan from evaluated triggers
pub fn build_body(content_type: ContentType, triggers: &TriggerSet) -> BodyPlan {
    build_body_with(manifest_table(), content_type, triggers)
}

pub fn build_body_with(
    table: &ManifestTable,
    content_type: ContentType,
    triggers: &TriggerSet,
) -> BodyPlan {
    let sections = table
        .sections_for(content_type, triggers)
        .into_iter()
        .map(|entry| BodySection {
            id: entry.id.clone(),
            heading: format!("## {}", entry.title),
            trigger: entry.trigger,
        })
        .collect();

    BodyPlan {
        content_type,
        sections,
    }
}

/// Ordered section plan for one document, with the triggers it was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionManifest {
    pub content_type: ContentType,
    pub triggers: TriggerSet,
    pub toc: TableOfContents,
    pub body: BodyPlan,
}

impl SectionManifest {
    pub fn section_ids(&self) -> Vec<&SectionId> {
        self.toc.section_ids()
    }
}

/// Evaluate triggers once and build both views from the result
pub fn evaluate_trigger_section_manifest(
    content_type: ContentType,
    profile: &AthleteProfile,
) -> SectionManifest {
    evaluate_trigger_section_manifest_with(manifest_table(), content_type, profile)
}

/// Same as [`evaluate_trigger_section_manifest`], planned against `table`
pub fn evaluate_trigger_section_manifest_with(
    table: &ManifestTable,
    content_type: ContentType,
    profile: &AthleteProfile,
) -> SectionManifest {
    let triggers = trigger::evaluate(profile);
    SectionManifest {
        content_type,
        triggers,
        toc: build_toc_with(table, content_type, &triggers),
        body: build_body_with(table, content_type, &triggers),
    }
}

/// Compare TOC and body section ids, returning a unified diff on mismatch
pub fn verify_alignment(toc: &TableOfContents, body: &BodyPlan) -> Result<()> {
    let toc_ids = join_ids(&toc.section_ids());
    let body_ids = join_ids(&body.section_ids());
    if toc.content_type == body.content_type && toc_ids == body_ids {
        return Ok(());
    }

    let diff = TextDiff::from_lines(&toc_ids, &body_ids)
        .unified_diff()
        .header(
            &format!("toc ({})", toc.content_type),
            &format!("body ({})", body.content_type),
        )
        .to_string();
    Err(GateError::ManifestDrift { diff })
}

fn join_ids(ids: &[&SectionId]) -> String {
    let mut out = String::new();
    for id in ids {
        out.push_str(id.as_str());
        out.push('\n');
    }
    out
}
