//! @acp:module "Hygiene Checks"
//! @acp:summary "Placeholder and null-text residue detection"
//! @acp:domain gate
//! @acp:layer logic
//!
//! Template residue (`[INSERT`, `TODO`, `{{`) and serialization leaks
//! (`undefined`, `NaN`, `[object Object]`). Both match case-sensitively.

use crate::phrases::{PhraseCategory, PhraseMatcher, PhraseSets};

use super::types::{CheckDetails, CheckOutcome};

#[derive(Debug, Clone)]
pub struct HygieneChecker {
    placeholders: PhraseMatcher,
    null_tokens: PhraseMatcher,
}

impl HygieneChecker {
    pub fn new(phrases: &PhraseSets) -> Result<Self, regex::Error> {
        let hygiene = &phrases.hygiene;
        Ok(Self {
            placeholders: PhraseMatcher::new(
                hygiene
                    .placeholders
                    .iter()
                    .map(|p| (p.as_str(), PhraseCategory::Placeholder)),
                false,
            )?,
            null_tokens: PhraseMatcher::new(
                hygiene
                    .null_tokens
                    .iter()
                    .map(|p| (p.as_str(), PhraseCategory::NullToken)),
                false,
            )?,
        })
    }

    pub fn check_placeholders(&self, text: &str) -> CheckOutcome {
        outcome(self.placeholders.find_all(text))
    }

    pub fn check_null_text(&self, text: &str) -> CheckOutcome {
        outcome(self.null_tokens.find_all(text))
    }
}

fn outcome(occurrences: Vec<crate::phrases::PhraseMatch>) -> CheckOutcome {
    CheckOutcome {
        passed: occurrences.is_empty(),
        details: CheckDetails::Hygiene { occurrences },
    }
}
