//! @acp:module "Section Renderer"
//! @acp:summary "Markdown rendering of section manifests"
//! @acp:domain manifest
//! @acp:layer output
//!
//! Renders a table of contents as markdown and a body plan as a section
//! skeleton for the writer to fill in.

use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::trigger::Trigger;

use super::builder::{BodyPlan, TableOfContents};

const TOC_TEMPLATE: &str = "\
{{#if title}}# {{title}}\n\n{{/if}}## Contents\n\n\
{{#each entries}}{{number}}. [{{title}}](#{{id}})\n{{/each}}";

const BODY_TEMPLATE: &str = "\
{{#each sections}}{{heading}}\n\n\
{{#if elevation_ft}}_Home elevation: {{elevation elevation_ft}}_\n\n{{/if}}\
<!-- section: {{id}} -->\n\n{{/each}}";

const FEET_TO_METERS: f64 = 0.3048;

handlebars_helper!(elevation: |feet: f64| format_elevation(feet));

/// Optional display data for rendered output
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderContext {
    pub title: Option<String>,
    /// Shown in the altitude section only
    pub elevation_ft: Option<f64>,
}

pub struct SectionRenderer {
    registry: Handlebars<'static>,
}

impl SectionRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("elevation", Box::new(elevation));
        registry.register_template_string("toc", TOC_TEMPLATE)?;
        registry.register_template_string("body", BODY_TEMPLATE)?;
        Ok(Self { registry })
    }

    pub fn render_toc(&self, toc: &TableOfContents, context: &RenderContext) -> Result<String> {
        let data = json!({
            "title": context.title,
            "entries": toc.entries(),
        });
        Ok(self.registry.render("toc", &data)?)
    }

    pub fn render_body(&self, body: &BodyPlan, context: &RenderContext) -> Result<String> {
        let sections: Vec<serde_json::Value> = body
            .sections()
            .iter()
            .map(|s| {
                let elevation_ft = match s.trigger {
                    Some(Trigger::Altitude) => context.elevation_ft,
                    _ => None,
                };
                json!({
                    "id": s.id,
                    "heading": s.heading,
                    "elevation_ft": elevation_ft,
                })
            })
            .collect();
        let rendered = self.registry.render("body", &json!({ "sections": sections }))?;
        Ok(rendered.trim_end().to_string() + "\n")
    }
}

/// Format an elevation for prose, e.g. `9,000 ft (2,743 m)`
pub fn format_elevation(feet: f64) -> String {
    if !feet.is_finite() {
        return "unknown elevation".to_string();
    }
    let meters = feet * FEET_TO_METERS;
    format!(
        "{} ft ({} m)",
        group_thousands(feet.round() as i64),
        group_thousands(meters.round() as i64)
    )
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}
