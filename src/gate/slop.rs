//! @acp:module "Slop Detector"
//! @acp:summary "Filler and hedge phrase detection"
//! @acp:domain gate
//! @acp:layer logic
//!
//! Counts filler, hedge and generic-enthusiasm phrases. Every occurrence counts,
//! including phrases inside quoted rider testimony.

use crate::phrases::{PhraseCategory, PhraseMatcher, PhraseSets};

use super::types::{CheckDetails, CheckOutcome};

#[derive(Debug, Clone)]
pub struct SlopDetector {
    matcher: PhraseMatcher,
    ceiling: usize,
}

impl SlopDetector {
    pub fn new(phrases: &PhraseSets, ceiling: usize) -> Result<Self, regex::Error> {
        let slop = &phrases.slop;
        let entries = slop
            .filler
            .iter()
            .map(|p| (p.as_str(), PhraseCategory::Filler))
            .chain(slop.hedge.iter().map(|p| (p.as_str(), PhraseCategory::Hedge)))
            .chain(
                slop.enthusiasm
                    .iter()
                    .map(|p| (p.as_str(), PhraseCategory::Enthusiasm)),
            );

        Ok(Self {
            matcher: PhraseMatcher::new(entries, true)?,
            ceiling,
        })
    }

    pub fn run(&self, text: &str) -> CheckOutcome {
        let slop_found = self.matcher.find_all(text);
        let slop_count = slop_found.len();
        tracing::debug!("slop: {} phrase(s), ceiling {}", slop_count, self.ceiling);

        CheckOutcome {
            passed: slop_count < self.ceiling,
            details: CheckDetails::Slop {
                slop_count,
                slop_found,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> SlopDetector {
        SlopDetector::new(&PhraseSets::builtin().unwrap(), 2).unwrap()
    }

    fn count(outcome: &CheckOutcome) -> usize {
        match &outcome.details {
            CheckDetails::Slop { slop_count, .. } => *slop_count,
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_worth_noting_and_remarkable_fail() {
        let outcome = detector().run("It's worth noting that this race is truly remarkable.");
        assert!(!outcome.passed);
        assert!(count(&outcome) >= 2);
    }

    #[test]
    fn test_clean_text_passes() {
        let outcome = detector().run("Mile 42 is where the race splits. Carry two bottles.");
        assert!(outcome.passed);
        assert_eq!(count(&outcome), 0);
    }

    #[test]
    fn test_single_phrase_is_under_ceiling() {
        let outcome = detector().run("Needless to say, the wind picks up after noon.");
        assert!(outcome.passed);
        assert_eq!(count(&outcome), 1);
    }

    #[test]
    fn test_quoted_testimony_still_counts() {
        let outcome =
            detector().run(r#"u/gravelgrinder said "it was truly special, simply amazing.""#);
        assert!(!outcome.passed);
        assert_eq!(count(&outcome), 2);
    }

    #[test]
    fn test_repeated_phrase_counts_each_time() {
        let outcome = detector().run("Dive into the mud, then dive into the gravel.");
        assert_eq!(count(&outcome), 2);
    }
}
