//! @acp:module "Phrase Matcher"
//! @acp:summary "Compiled phrase alternation matching"
//! @acp:domain gate
//! @acp:layer logic
//!
//! Compiles a phrase table into one alternation regex. Longest phrases are tried
//! first so that at a given offset the most specific phrase wins, and matches never
//! overlap. Apostrophes match both straight and curly forms and any whitespace run
//! matches a single space.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Which table a phrase came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseCategory {
    Filler,
    Hedge,
    Enthusiasm,
    BluntMarker,
    Corporate,
    PassiveHedge,
    Placeholder,
    NullToken,
}

/// One occurrence of a table phrase in a document.
///
/// Offsets are byte offsets into the text that was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseMatch {
    pub phrase: String,
    pub category: PhraseCategory,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Compiled matcher over a set of categorized phrases
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    regex: Option<Regex>,
    /// Table entry for each capture group, group `i + 1` is `entries[i]`
    entries: Vec<(String, PhraseCategory)>,
}

impl PhraseMatcher {
    /// Build a matcher from `(phrase, category)` pairs.
    ///
    /// Blank phrases are ignored. When two phrases normalize to the same key the
    /// first one listed keeps its category.
    pub fn new<'a, I>(pairs: I, case_insensitive: bool) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (&'a str, PhraseCategory)>,
    {
        let mut seen = HashSet::new();
        let mut entries: Vec<(String, PhraseCategory)> = Vec::new();

        for (phrase, category) in pairs {
            let phrase = phrase.trim();
            if phrase.is_empty() {
                continue;
            }
            if !seen.insert(normalize(phrase, case_insensitive)) {
                continue;
            }
            entries.push((phrase.to_string(), category));
        }

        // Stable sort keeps table order among equal lengths
        entries.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let regex = if entries.is_empty() {
            None
        } else {
            let alternation = entries
                .iter()
                .map(|(p, _)| format!("({})", phrase_pattern(p)))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&alternation)
                    .case_insensitive(case_insensitive)
                    .build()?,
            )
        };

        Ok(Self { regex, entries })
    }

    /// Every non-overlapping occurrence, in document order
    pub fn find_all(&self, text: &str) -> Vec<PhraseMatch> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };

        regex
            .captures_iter(text)
            .filter_map(|caps| {
                let (index, m) = caps
                    .iter()
                    .enumerate()
                    .skip(1)
                    .find_map(|(i, group)| group.map(|m| (i - 1, m)))?;
                let (phrase, category) = self.entries.get(index)?;
                Some(PhraseMatch {
                    phrase: phrase.clone(),
                    category: *category,
                    start_offset: m.start(),
                    end_offset: m.end(),
                })
            })
            .collect()
    }

    pub fn count(&self, text: &str) -> usize {
        self.regex
            .as_ref()
            .map(|r| r.find_iter(text).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }
}

/// Regex source for a single phrase.
///
/// Word boundaries are only added on ends that are word characters, so tokens
/// like `{{` or `[INSERT` still match next to punctuation.
fn phrase_pattern(phrase: &str) -> String {
    let mut out = String::new();
    let mut in_whitespace = false;

    for c in phrase.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push_str(r"\s+");
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if c == '\'' || c == '\u{2019}' {
            out.push_str("['\u{2019}]");
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }

    let starts_word = phrase.chars().next().is_some_and(is_word_char);
    let ends_word = phrase.chars().last().is_some_and(is_word_char);
    format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        out,
        if ends_word { r"\b" } else { "" }
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn normalize(s: &str, case_insensitive: bool) -> String {
    let collapsed = s
        .replace('\u{2019}', "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if case_insensitive {
        collapsed.to_lowercase()
    } else {
        collapsed
    }
}
