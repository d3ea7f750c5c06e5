//! @acp:module "Section Completeness"
//! @acp:summary "Required section header presence"
//! @acp:domain gate
//! @acp:layer logic
//!
//! A required section is present when its header string occurs verbatim
//! (case-sensitive) anywhere in the document. No markdown parsing.

use super::types::{CheckDetails, CheckOutcome};

pub fn missing_sections<'a>(text: &str, required: &'a [String]) -> Vec<&'a str> {
    required
        .iter()
        .filter(|header| !text.contains(header.as_str()))
        .map(String::as_str)
        .collect()
}

pub fn check_sections(text: &str, required: &[String]) -> CheckOutcome {
    let missing: Vec<String> = missing_sections(text, required)
        .into_iter()
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        tracing::debug!("sections: missing {:?}", missing);
    }

    CheckOutcome {
        passed: missing.is_empty(),
        details: CheckDetails::Sections {
            required: required.len(),
            missing_sections: missing,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_missing_weather_reported_in_order() {
        let required = headers(&["## OVERVIEW", "## WEATHER", "## TERRAIN"]);
        let text = "## OVERVIEW\nflat and fast\n## TERRAIN\nlimestone";
        assert_eq!(missing_sections(text, &required), vec!["## WEATHER"]);
        assert!(!check_sections(text, &required).passed);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let required = headers(&["## WEATHER"]);
        assert_eq!(missing_sections("## Weather\nhot", &required), vec!["## WEATHER"]);
    }

    #[test]
    fn test_header_anywhere_counts() {
        let required = headers(&["## COURSE"]);
        assert!(check_sections("intro text ## COURSE inline", &required).passed);
    }
}
