//! @acp:module "Manifest Command"
//! @acp:summary "Print or render the section manifest for a profile"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Evaluate an athlete profile and print the section manifest for a document.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use console::style;
use serde_json::json;

use crate::config::Config;
use crate::content::ContentType;
use crate::error::GateError;
use crate::manifest::{
    evaluate_trigger_section_manifest_with, verify_alignment, RenderContext, SectionRenderer,
};
use crate::trigger::AthleteProfile;

/// Which half of the manifest to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestView {
    Toc,
    Body,
    #[default]
    Both,
}

impl ManifestView {
    fn shows_toc(&self) -> bool {
        matches!(self, ManifestView::Toc | ManifestView::Both)
    }

    fn shows_body(&self) -> bool {
        matches!(self, ManifestView::Body | ManifestView::Both)
    }
}

impl FromStr for ManifestView {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toc" => Ok(ManifestView::Toc),
            "body" => Ok(ManifestView::Body),
            "both" => Ok(ManifestView::Both),
            _ => Err(anyhow!("Unknown manifest view: {}", s)),
        }
    }
}

/// Options for the manifest command
#[derive(Debug, Clone)]
pub struct ManifestOptions {
    pub content_type: ContentType,
    /// Athlete profile (JSON or YAML)
    pub profile: PathBuf,
    pub view: ManifestView,
    /// Render markdown instead of listing section ids
    pub render: bool,
    /// Heading for rendered output
    pub title: Option<String>,
    pub json: bool,
    /// Compare TOC and body ids and fail on drift
    pub verify: bool,
}

/// Execute the manifest command. Returns the process exit code.
pub fn execute_manifest(options: ManifestOptions, config: &Config) -> Result<i32> {
    let profile = AthleteProfile::load(&options.profile)
        .with_context(|| format!("Failed to load profile {}", options.profile.display()))?;
    let table = config.build_manifest_table()?;
    let manifest = evaluate_trigger_section_manifest_with(&table, options.content_type, &profile);

    let mut exit_code = 0;
    if options.verify {
        match verify_alignment(&manifest.toc, &manifest.body) {
            Ok(()) => {}
            Err(GateError::ManifestDrift { diff }) => {
                eprintln!("{} Table of contents and body disagree", style("✗").red());
                eprintln!("{}", diff);
                exit_code = 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if options.render {
        let renderer = SectionRenderer::new()?;
        let context = RenderContext {
            title: options.title.clone(),
            elevation_ft: Some(profile.elevation_ft),
        };
        if options.view.shows_toc() {
            println!("{}", renderer.render_toc(&manifest.toc, &context)?);
        }
        if options.view.shows_body() {
            print!("{}", renderer.render_body(&manifest.body, &context)?);
        }
        return Ok(exit_code);
    }

    if options.json {
        let mut output = json!({
            "content_type": manifest.content_type,
            "triggers": manifest.triggers,
        });
        if options.view.shows_toc() {
            output["toc"] = serde_json::to_value(manifest.toc.entries())?;
        }
        if options.view.shows_body() {
            output["body"] = serde_json::to_value(manifest.body.sections())?;
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(exit_code);
    }

    let active: Vec<String> = manifest
        .triggers
        .active()
        .iter()
        .map(|t| format!("{:?}", t))
        .collect();
    println!(
        "{} {} manifest, triggers: {}",
        style("→").cyan(),
        manifest.content_type,
        if active.is_empty() {
            "none".to_string()
        } else {
            active.join(", ")
        }
    );
    if options.view.shows_toc() {
        println!("{}", style("Table of contents").bold());
        for entry in manifest.toc.entries() {
            println!("  {:>2}. {} ({})", entry.number, entry.title, style(&entry.id).dim());
        }
    }
    if options.view.shows_body() {
        println!("{}", style("Body").bold());
        for section in manifest.body.sections() {
            let marker = if section.trigger.is_some() { "+" } else { " " };
            println!("  {} {}", style(marker).green(), section.heading);
        }
    }

    Ok(exit_code)
}
