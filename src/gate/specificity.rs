//! @acp:module "Specificity Scorer"
//! @acp:summary "Concrete referent counting"
//! @acp:domain gate
//! @acp:layer logic
//!
//! Counts concrete referents: mile markers, forum handles and percentages.
//! Vague, unattributed prose fails even when it reads well.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{CheckDetails, CheckOutcome};

/// `mile 42`, `Mile Marker 12`, `mi 80`, `mi. 80`
static MILE_MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:mile(?:\s+marker)?|mi\.?)\s*\d+(?:\.\d+)?\b").unwrap()
});

/// Forum handles such as `u/gravel_grinder`
static REDDIT_USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bu/[A-Za-z0-9_-]{3,20}\b").unwrap());

/// `12%`, `12.5 %`, `40 percent`
static PERCENTAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?(?:\s?%|\s+percent\b)").unwrap()
});

#[derive(Debug, Clone)]
pub struct SpecificityScorer {
    min_categories: usize,
}

impl SpecificityScorer {
    pub fn new(min_categories: usize) -> Self {
        Self { min_categories }
    }

    pub fn run(&self, text: &str) -> CheckOutcome {
        let mile_markers = MILE_MARKER_PATTERN.find_iter(text).count();
        let reddit_usernames = REDDIT_USERNAME_PATTERN.find_iter(text).count();
        let percentages = PERCENTAGE_PATTERN.find_iter(text).count();
        let categories_hit = [mile_markers, reddit_usernames, percentages]
            .iter()
            .filter(|&&n| n > 0)
            .count();

        tracing::debug!(
            "specificity: miles={} handles={} percents={}",
            mile_markers,
            reddit_usernames,
            percentages
        );

        CheckOutcome {
            passed: categories_hit >= self.min_categories,
            details: CheckDetails::Specificity {
                mile_markers,
                reddit_usernames,
                percentages,
                categories_hit,
            },
        }
    }
}
