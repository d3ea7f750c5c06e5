//! @acp:module "Gate Thresholds"
//! @acp:summary "Built-in threshold constants and section tables"
//! @acp:domain gate
//! @acp:layer data
//!
//! Built-in threshold values and required section schemas. These definitions are
//! checked against `contracts/gate_thresholds.json` by `guidegate audit gate-spec`,
//! so keep each one a plain `pub const` on a single declaration.

/// Gate spec version carried in every report
pub const GATE_SPEC_VERSION: &str = "2026.10";

/// Slop passes only while the phrase count stays below this ceiling
pub const SLOP_CEILING: usize = 2;

pub const MIN_VOICE_SCORE: i64 = 40;

/// Out of mile markers, forum handles and percentages
pub const MIN_SPECIFICITY_CATEGORIES: usize = 2;

pub const MIN_CITATIONS_RESEARCH: usize = 3;
pub const MIN_CITATIONS_BRIEF: usize = 1;
pub const MIN_CITATIONS_GUIDE: usize = 1;

pub const MIN_GUIDE_BYTES: usize = 20_000;
pub const MAX_GUIDE_BYTES: usize = 500_000;

/// Workout files required per plan week
pub const MIN_WORKOUT_FILES_PER_WEEK: f64 = 3.0;

pub const RESEARCH_SECTIONS: &[&str] = &[
    "## OVERVIEW",
    "## COURSE",
    "## WEATHER",
    "## TERRAIN",
    "## LOGISTICS",
    "## RIDER INTEL",
];

pub const BRIEF_SECTIONS: &[&str] = &[
    "## Verdict",
    "## Key Numbers",
    "## Course Profile",
    "## Training Implications",
];

pub const GUIDE_SECTIONS: &[&str] = &[
    "## Race Overview",
    "## Course Breakdown",
    "## Training Plan",
    "## Fueling Strategy",
    "## Pacing Strategy",
    "## Equipment",
    "## Race Week",
    "## Race Day",
];
