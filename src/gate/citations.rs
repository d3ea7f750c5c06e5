//! @acp:module "Citation Counter"
//! @acp:summary "Count and classify cited sources"
//! @acp:domain gate
//! @acp:layer logic
//!
//! Extracts URLs, deduplicates them, and classifies each by host into forum,
//! video, social, official or other.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::phrases::SourceCategories;

use super::types::{CheckDetails, CheckOutcome};

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>()\[\]{}"'`]+"#).unwrap());

/// Source category, ordered by classification precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationCategory {
    Forum,
    Video,
    Social,
    Official,
    Other,
}

impl CitationCategory {
    pub const ALL: [CitationCategory; 5] = [
        CitationCategory::Forum,
        CitationCategory::Video,
        CitationCategory::Social,
        CitationCategory::Official,
        CitationCategory::Other,
    ];
}

/// A URL with its resolved category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub url: String,
    pub host: String,
    pub category: CitationCategory,
}

#[derive(Debug, Clone)]
pub struct CitationCounter {
    rules: SourceCategories,
}

impl CitationCounter {
    pub fn new(rules: SourceCategories) -> Self {
        Self { rules }
    }

    /// Unique citations in order of first appearance
    pub fn extract(&self, text: &str) -> Vec<Citation> {
        let mut seen = HashSet::new();
        URL_PATTERN
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']))
            .filter(|url| seen.insert(url.to_string()))
            .map(|url| {
                let host = host_of(url);
                Citation {
                    url: url.to_string(),
                    category: self.classify(&host),
                    host,
                }
            })
            .collect()
    }

    pub fn classify(&self, host: &str) -> CitationCategory {
        let ordered = [
            (CitationCategory::Forum, &self.rules.forum),
            (CitationCategory::Video, &self.rules.video),
            (CitationCategory::Social, &self.rules.social),
            (CitationCategory::Official, &self.rules.official),
        ];
        ordered
            .into_iter()
            .find(|(_, rules)| rules.iter().any(|rule| host_matches(host, rule)))
            .map(|(category, _)| category)
            .unwrap_or(CitationCategory::Other)
    }

    pub fn run(&self, text: &str, minimum: usize) -> CheckOutcome {
        let citations = self.extract(text);

        let mut breakdown: BTreeMap<CitationCategory, usize> =
            CitationCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        for citation in &citations {
            *breakdown.entry(citation.category).or_insert(0) += 1;
        }

        let total = citations.len();
        let diverse = breakdown
            .iter()
            .any(|(category, n)| *category != CitationCategory::Other && *n > 0);
        tracing::debug!("citations: {} unique (min {}), diverse={}", total, minimum, diverse);

        CheckOutcome {
            passed: total >= minimum && diverse,
            details: CheckDetails::Citations {
                total,
                minimum,
                breakdown,
            },
        }
    }
}

/// Lowercased host without userinfo, port or a leading `www.`
fn host_of(url: &str) -> String {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let authority = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    let host = authority.split(':').next().unwrap_or("").to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

fn host_matches(host: &str, rule: &str) -> bool {
    let rule = rule.to_lowercase();
    if rule.starts_with('.') {
        host.ends_with(&rule)
    } else if rule.ends_with('.') {
        host.starts_with(&rule)
    } else if rule.contains('.') {
        host == rule || host.ends_with(&format!(".{}", rule))
    } else {
        host.contains(&rule)
    }
}
