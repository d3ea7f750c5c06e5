//! @acp:module "Athlete Profile"
//! @acp:summary "Athlete profile loading and validation"
//! @acp:domain trigger
//! @acp:layer model
//!
//! Externally supplied athlete attributes. Only elevation, sex and age feed the
//! trigger engine; every other questionnaire field is carried along untouched.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GateError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[serde(alias = "m", alias = "M", alias = "Male", alias = "MALE")]
    Male,
    #[serde(alias = "f", alias = "F", alias = "Female", alias = "FEMALE")]
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Elevation the athlete lives and trains at, in feet
    #[serde(alias = "elevation")]
    pub elevation_ft: f64,
    pub sex: Sex,
    pub age: u32,
    /// Remaining questionnaire fields, ignored by the trigger engine
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AthleteProfile {
    pub fn new(elevation_ft: f64, sex: Sex, age: u32) -> Self {
        Self {
            elevation_ft,
            sex,
            age,
            extra: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self =
            serde_json::from_str(json).map_err(|e| GateError::InvalidProfile(e.to_string()))?;
        profile.validate()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let profile: Self =
            serde_yaml::from_str(yaml).map_err(|e| GateError::InvalidProfile(e.to_string()))?;
        profile.validate()
    }

    /// Load a profile file, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&raw),
            _ => Self::from_json(&raw),
        }
    }

    fn validate(self) -> Result<Self> {
        if !self.elevation_ft.is_finite() {
            return Err(GateError::InvalidProfile(format!(
                "elevation_ft must be a finite number, got {}",
                self.elevation_ft
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_extra_fields() {
        let profile = AthleteProfile::from_json(
            r#"{"elevation_ft": 9000, "sex": "female", "age": 45, "name": "Sam", "weekly_hours": 9}"#,
        )
        .unwrap();
        assert_eq!(profile.elevation_ft, 9000.0);
        assert_eq!(profile.sex, Sex::Female);
        assert_eq!(profile.age, 45);
        assert_eq!(profile.extra["name"], serde_json::json!("Sam"));
    }

    #[test]
    fn test_sex_aliases() {
        let profile = AthleteProfile::from_yaml("elevation: 600\nsex: M\nage: 31\n").unwrap();
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.elevation_ft, 600.0);
    }

    #[test]
    fn test_unparseable_profiles_rejected() {
        assert!(matches!(
            AthleteProfile::from_json(r#"{"sex": "female", "age": 45}"#),
            Err(GateError::InvalidProfile(_))
        ));
        assert!(AthleteProfile::from_json(r#"{"elevation_ft": 1, "sex": "x", "age": 3}"#).is_err());
        assert!(
            AthleteProfile::from_json(r#"{"elevation_ft": 1, "sex": "male", "age": -3}"#).is_err()
        );
        assert!(AthleteProfile::from_json("not json").is_err());
    }
}
