//! @acp:module "Output Helpers"
//! @acp:summary "Terminal formatting for gate reports"
//! @acp:domain cli
//! @acp:layer output
//!
//! Terminal formatting shared by the command handlers.

use console::style;

use crate::gate::{CheckDetails, CheckResult, GateReport, Severity};

/// One-line human summary of a check payload
pub fn summarize(details: &CheckDetails) -> String {
    match details {
        CheckDetails::Content { blank, bytes } => {
            if *blank {
                "document is empty".to_string()
            } else {
                format!("{} bytes", bytes)
            }
        }
        CheckDetails::Slop {
            slop_count,
            slop_found,
        } => {
            let phrases: Vec<&str> = slop_found.iter().map(|m| m.phrase.as_str()).collect();
            if phrases.is_empty() {
                "no slop phrases".to_string()
            } else {
                format!("{} phrase(s): {}", slop_count, phrases.join(", "))
            }
        }
        CheckDetails::Voice(v) => format!(
            "score {} (numbers {}, blunt {}, you {}, short {}, corporate {}, hedges {})",
            v.voice_score,
            v.numbers,
            v.blunt_markers,
            v.second_person,
            v.short_sentences,
            v.corporate_phrases,
            v.passive_hedges
        ),
        CheckDetails::Specificity {
            mile_markers,
            reddit_usernames,
            percentages,
            categories_hit,
        } => format!(
            "{}/3 categories (miles {}, handles {}, percentages {})",
            categories_hit, mile_markers, reddit_usernames, percentages
        ),
        CheckDetails::Sections {
            required,
            missing_sections,
        } => {
            if missing_sections.is_empty() {
                format!("all {} sections present", required)
            } else {
                format!("missing {}", missing_sections.join(", "))
            }
        }
        CheckDetails::Citations { total, minimum, .. } => {
            format!("{} citation(s), minimum {}", total, minimum)
        }
        CheckDetails::Hygiene { occurrences } => {
            if occurrences.is_empty() {
                "clean".to_string()
            } else {
                let found: Vec<&str> = occurrences.iter().map(|m| m.phrase.as_str()).collect();
                format!("found {}", found.join(", "))
            }
        }
        CheckDetails::Size {
            bytes,
            min_bytes,
            max_bytes,
        } => format!("{} bytes (allowed {}..={})", bytes, min_bytes, max_bytes),
        CheckDetails::WorkoutCoverage {
            weeks,
            workout_files,
            required_files,
        } => format!(
            "{} workout file(s) for {} week(s), need {}",
            workout_files, weeks, required_files
        ),
    }
}

pub fn print_check(result: &CheckResult) {
    let mark = match (result.passed, result.severity) {
        (true, _) => style("✓").green(),
        (false, Severity::Critical) => style("✗").red(),
        (false, Severity::Warning) => style("⚠").yellow(),
    };
    println!(
        "  {} {:<12} {}",
        mark,
        result.name.as_str(),
        style(summarize(&result.details)).dim()
    );
}

pub fn print_report(label: &str, report: &GateReport) {
    let verdict = if report.overall_passed() {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    };
    println!(
        "{} {} ({}, spec {})",
        verdict,
        label,
        report.content_type(),
        report.spec_version()
    );
    for check in report.checks() {
        print_check(check);
    }
}
