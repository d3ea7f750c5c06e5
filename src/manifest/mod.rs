//! @acp:module "Section Manifest"
//! @acp:summary "Trigger-driven section planning"
//! @acp:domain manifest
//! @acp:layer service
//!
//! Trigger-driven section planning: which sections a document contains, in
//! what order, for both the table of contents and the body.

pub mod builder;
pub mod renderer;
pub mod table;

pub use builder::{
    build_body, build_body_with, build_toc, build_toc_with, evaluate_trigger_section_manifest,
    evaluate_trigger_section_manifest_with, verify_alignment, BodyPlan, BodySection,
    SectionManifest, TableOfContents, TocEntry,
};
pub use renderer::{format_elevation, RenderContext, SectionRenderer};
pub use table::{manifest_table, ManifestTable, SectionEntry, SectionId};
