//! @acp:module "Triggers"
//! @acp:summary "Athlete profiles and trigger evaluation"
//! @acp:domain trigger
//! @acp:layer service
//!
//! Athlete profiles and the conditional trigger evaluator.

pub mod evaluator;
pub mod profile;

pub use evaluator::{evaluate, Trigger, TriggerSet, ALTITUDE_THRESHOLD_FT, MASTERS_AGE};
pub use profile::{AthleteProfile, Sex};
