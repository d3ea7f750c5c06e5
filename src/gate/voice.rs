//! @acp:module "Voice Scorer"
//! @acp:summary "Weighted directness scoring"
//! @acp:domain gate
//! @acp:layer logic
//!
//! Weighted, unbounded score of how direct a document reads. Weights come from
//! [`VoiceWeights`] in the gate spec; this module only counts features.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::phrases::{PhraseCategory, PhraseMatcher, PhraseSets};

use super::spec::VoiceWeights;
use super::types::{CheckDetails, CheckOutcome};

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b").unwrap());

static SECOND_PERSON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\byou(?:r|rs|['\u{2019}]re|['\u{2019}]ll)?\b").unwrap()
});

/// Sentence terminators: punctuation followed by whitespace or end of text, or
/// a line break. A period inside `42.5` is not a terminator.
static SENTENCE_END_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)|\n+").unwrap());

const SHORT_SENTENCE_MAX_WORDS: usize = 8;

/// Feature counts and the resulting score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceBreakdown {
    pub voice_score: i64,
    pub numbers: usize,
    pub blunt_markers: usize,
    pub second_person: usize,
    pub short_sentences: usize,
    pub corporate_phrases: usize,
    pub passive_hedges: usize,
}

#[derive(Debug, Clone)]
pub struct VoiceScorer {
    weights: VoiceWeights,
    min_score: i64,
    blunt: PhraseMatcher,
    corporate: PhraseMatcher,
    passive: PhraseMatcher,
}

impl VoiceScorer {
    pub fn new(
        phrases: &PhraseSets,
        weights: VoiceWeights,
        min_score: i64,
    ) -> Result<Self, regex::Error> {
        let voice = &phrases.voice;
        let matcher = |list: &[String], category| {
            PhraseMatcher::new(list.iter().map(|p| (p.as_str(), category)), true)
        };

        Ok(Self {
            weights,
            min_score,
            blunt: matcher(&voice.blunt_markers, PhraseCategory::BluntMarker)?,
            corporate: matcher(&voice.corporate, PhraseCategory::Corporate)?,
            passive: matcher(&voice.passive_hedges, PhraseCategory::PassiveHedge)?,
        })
    }

    pub fn score(&self, text: &str) -> VoiceBreakdown {
        let numbers = NUMBER_PATTERN.find_iter(text).count();
        let blunt_markers = self.blunt.count(text);
        let second_person = SECOND_PERSON_PATTERN.find_iter(text).count();
        let short_sentences = count_short_sentences(text);
        let corporate_phrases = self.corporate.count(text);
        let passive_hedges = self.passive.count(text);

        let w = &self.weights;
        let voice_score = [
            w.number.apply(numbers),
            w.blunt_marker.apply(blunt_markers),
            w.second_person.apply(second_person),
            w.short_sentence.apply(short_sentences),
            w.corporate.apply(corporate_phrases),
            w.passive_hedge.apply(passive_hedges),
        ]
        .into_iter()
        .fold(w.base, i64::saturating_add);

        VoiceBreakdown {
            voice_score,
            numbers,
            blunt_markers,
            second_person,
            short_sentences,
            corporate_phrases,
            passive_hedges,
        }
    }

    pub fn run(&self, text: &str) -> CheckOutcome {
        let breakdown = self.score(text);
        tracing::debug!("voice: score {} (min {})", breakdown.voice_score, self.min_score);
        CheckOutcome {
            passed: breakdown.voice_score >= self.min_score,
            details: CheckDetails::Voice(breakdown),
        }
    }
}

fn count_short_sentences(text: &str) -> usize {
    let mut count = 0;
    let mut start = 0;

    for terminator in SENTENCE_END_PATTERN.find_iter(text) {
        let sentence = text[start..terminator.start()].trim();
        start = terminator.end();

        if !terminator.as_str().trim_end().ends_with('.') {
            continue;
        }
        let words = sentence.split_whitespace().count();
        if (1..=SHORT_SENTENCE_MAX_WORDS).contains(&words) {
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::spec::FeatureWeight;

    fn scorer() -> VoiceScorer {
        VoiceScorer::new(&PhraseSets::builtin().unwrap(), VoiceWeights::default(), 40).unwrap()
    }

    #[test]
    fn test_empty_text_scores_base() {
        let breakdown = scorer().score("");
        assert_eq!(breakdown.voice_score, 10);
        assert!(!scorer().run("").passed);
    }

    #[test]
    fn test_direct_prose_passes() {
        let text = "Here's the truth: most riders blow up at mile 140. \
                    Don't chase the front group. You will lose 20 minutes if you do. \
                    Eat 90 grams of carbs per hour. Skip the aid station at mile 75.";
        let breakdown = scorer().score(text);
        assert!(breakdown.blunt_markers >= 4, "{:?}", breakdown);
        assert!(breakdown.numbers >= 4);
        assert!(breakdown.voice_score >= 40, "{:?}", breakdown);
    }

    #[test]
    fn test_brochure_prose_fails() {
        let text = "This world-class event offers a seamless, curated experience \
                    at a premier destination. It is believed that the course is unparalleled.";
        let breakdown = scorer().score(text);
        assert!(breakdown.corporate_phrases >= 4);
        assert_eq!(breakdown.passive_hedges, 1);
        assert!(breakdown.voice_score < 0);
    }

    #[test]
    fn test_caps_limit_feature_contribution() {
        let text = "1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20";
        let breakdown = scorer().score(text);
        assert_eq!(breakdown.numbers, 20);
        assert_eq!(breakdown.voice_score, 10 + 30);
    }

    #[test]
    fn test_extreme_weights_saturate() {
        let mut weights = VoiceWeights::default();
        weights.base = i64::MAX - 1;
        weights.number = FeatureWeight::uncapped(i64::MAX);
        weights.second_person = FeatureWeight::uncapped(i64::MAX);
        let scorer = VoiceScorer::new(&PhraseSets::builtin().unwrap(), weights, 40).unwrap();
        let breakdown = scorer.score("You ride 200 miles and 11,000 feet.");
        assert_eq!(breakdown.voice_score, i64::MAX);
        assert!(scorer.run("You ride 200 miles.").passed);
    }

    #[test]
    fn test_short_sentences() {
        assert_eq!(count_short_sentences("Carry two bottles. The climb at mile 42.5 is long."), 2);
        assert_eq!(
            count_short_sentences("This sentence has far more than eight words in it overall."),
            0
        );
        assert_eq!(count_short_sentences("## Verdict\nGo out slow."), 1);
        assert_eq!(count_short_sentences("Is it hard? Yes!"), 0);
    }
}
