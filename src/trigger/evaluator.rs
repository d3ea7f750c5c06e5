//! @acp:module "Conditional Trigger Evaluator"
//! @acp:summary "Single evaluator for optional-section triggers"
//! @acp:domain trigger
//! @acp:layer logic
//!
//! Single source of truth for which optional guide sections an athlete gets.
//! `evaluate` is the only place the three conditions are written down, and
//! `TriggerSet` can only be obtained from it; the manifest builder accepts a
//! `TriggerSet` and never sees raw profile fields.

use serde::Serialize;

use super::profile::{AthleteProfile, Sex};

/// Above this home elevation the altitude section is included
pub const ALTITUDE_THRESHOLD_FT: f64 = 5000.0;

/// Age at which masters content is included
pub const MASTERS_AGE: u32 = 40;

/// One optional-content trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Altitude,
    WomenSpecific,
    Masters,
}

/// Trigger flags derived from a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(test, derive(Default))]
pub struct TriggerSet {
    altitude: bool,
    women_specific: bool,
    masters: bool,
}

impl TriggerSet {
    pub fn altitude(&self) -> bool {
        self.altitude
    }

    pub fn women_specific(&self) -> bool {
        self.women_specific
    }

    pub fn masters(&self) -> bool {
        self.masters
    }

    pub fn is_active(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Altitude => self.altitude,
            Trigger::WomenSpecific => self.women_specific,
            Trigger::Masters => self.masters,
        }
    }

    /// Active triggers in fixed order
    pub fn active(&self) -> Vec<Trigger> {
        [Trigger::Altitude, Trigger::WomenSpecific, Trigger::Masters]
            .into_iter()
            .filter(|t| self.is_active(*t))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn from_flags(altitude: bool, women_specific: bool, masters: bool) -> Self {
        Self {
            altitude,
            women_specific,
            masters,
        }
    }
}

/// Derive the trigger set for a profile.
///
/// Pure and total: a NaN elevation compares false and yields no altitude trigger.
pub fn evaluate(profile: &AthleteProfile) -> TriggerSet {
    let triggers = TriggerSet {
        altitude: profile.elevation_ft > ALTITUDE_THRESHOLD_FT,
        women_specific: profile.sex == Sex::Female,
        masters: profile.age >= MASTERS_AGE,
    };
    tracing::debug!("triggers: {:?}", triggers.active());
    triggers
}
