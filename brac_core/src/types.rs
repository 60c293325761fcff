//! Core domain types for the alcohol simulator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Subject anthropometrics and tolerance
//! - Model configuration (absorption, elimination, blood:breath ratio)
//! - Intake events

use crate::{physiology, Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Subject Types
// ============================================================================

/// Biological sex, selects the total-body-water equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "h" | "hombre" => Ok(Sex::Male),
            "f" | "female" | "w" | "woman" | "mujer" => Ok(Sex::Female),
            other => Err(Error::Config(format!("Unknown sex: '{}'", other))),
        }
    }
}

impl TryFrom<String> for Sex {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// How the volume of distribution is derived
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VdMethod {
    /// Watson total body water estimate
    Watson,
    /// Widmark-style `r × weight`
    FixedRatio,
}

/// The person being simulated
///
/// Fields missing from a config file take the values of `Subject::default()`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Subject {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
    pub sex: Sex,

    /// Nominal exhaled-air temperature
    pub breath_temp_c: f64,

    /// 0.0 (naive) to 1.0 (chronic consumption); clamped when used
    pub habitual_level: f64,

    pub vd_method: VdMethod,

    /// L/kg, only used with [`VdMethod::FixedRatio`]
    pub widmark_r: f64,
}

impl Default for Subject {
    fn default() -> Self {
        Self {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 35.0,
            sex: Sex::Male,
            breath_temp_c: 34.0,
            habitual_level: 0.0,
            vd_method: VdMethod::Watson,
            widmark_r: 0.6,
        }
    }
}

impl Subject {
    /// Volume of distribution in liters
    ///
    /// Recomputed on every call. The engine reads it once per run.
    pub fn volume_of_distribution(&self) -> f64 {
        match self.vd_method {
            VdMethod::Watson => physiology::total_body_water_liters(
                self.sex,
                self.age_years,
                self.height_cm,
                self.weight_kg,
            ),
            VdMethod::FixedRatio => self.widmark_r * self.weight_kg,
        }
    }

    /// Tolerance level clamped to [0, 1]
    pub fn tolerance(&self) -> f64 {
        self.habitual_level.clamp(0.0, 1.0)
    }

    /// Validate the subject for physical plausibility
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            errors.push(format!("weight_kg must be positive, got {}", self.weight_kg));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            errors.push(format!("height_cm must be positive, got {}", self.height_cm));
        }
        if !(self.age_years.is_finite() && self.age_years >= 0.0) {
            errors.push(format!("age_years must be non-negative, got {}", self.age_years));
        }
        if !self.breath_temp_c.is_finite() {
            errors.push("breath_temp_c must be finite".to_string());
        }
        if self.vd_method == VdMethod::FixedRatio && !(self.widmark_r > 0.0) {
            errors.push(format!("widmark_r must be positive, got {}", self.widmark_r));
        }

        let vd = self.volume_of_distribution();
        if !(vd.is_finite() && vd > 0.0) {
            errors.push(format!("volume of distribution is non-physical: {} L", vd));
        }

        errors
    }
}

// ============================================================================
// Model Configuration
// ============================================================================

/// Which elimination law is active for a run
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum EliminationMode {
    /// Michaelis-Menten
    Saturable,
    /// Zero order
    ConstantRate,
    /// First order
    Proportional,
}

impl FromStr for EliminationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "saturable" | "mm" => Ok(EliminationMode::Saturable),
            "constant-rate" | "constant_rate" | "zero" => Ok(EliminationMode::ConstantRate),
            "proportional" | "ke" => Ok(EliminationMode::Proportional),
            other => Err(Error::Config(format!("Unknown elimination mode: '{}'", other))),
        }
    }
}

impl TryFrom<String> for EliminationMode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Elimination law with the parameters it actually uses
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EliminationLaw {
    /// `vmax` g/L/h and `km` g/L
    Saturable { vmax: f64, km: f64 },
    /// `beta` g/L/h
    ConstantRate { beta: f64 },
    /// `ke` 1/h
    Proportional { ke: f64 },
}

impl EliminationLaw {
    /// Scale the law's capacity for a habitual drinker (`tolerance` in [0, 1])
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        match self {
            EliminationLaw::Saturable { vmax, km } => EliminationLaw::Saturable {
                vmax: vmax * (1.0 + 0.6 * tolerance),
                km: (km * (1.0 + 0.2 * tolerance)).max(1e-6),
            },
            EliminationLaw::ConstantRate { beta } => EliminationLaw::ConstantRate {
                beta: beta * (1.0 + 0.4 * tolerance),
            },
            law @ EliminationLaw::Proportional { .. } => law,
        }
    }

    /// Elimination rate in g/h, before capping to the mass on hand
    pub fn rate(&self, central_mass: f64, vd: f64) -> f64 {
        match *self {
            EliminationLaw::Saturable { vmax, km } => {
                let c = central_mass / vd;
                vmax * c / (km + c) * vd
            }
            EliminationLaw::ConstantRate { beta } => beta * vd,
            EliminationLaw::Proportional { ke } => ke * central_mass,
        }
    }
}

/// Absorption, elimination and blood:breath parameters
///
/// All three elimination parameter groups are carried; `elimination_mode`
/// picks the one that is used.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Baseline absorption rate constant, 1/h (fasting)
    pub ka: f64,
    /// <1 with food
    pub meal_factor: f64,
    /// >1 for strongly carbonated drinks
    pub carbonation_factor: f64,

    pub elimination_mode: EliminationMode,
    pub vmax: f64,
    pub km: f64,
    pub beta: f64,
    pub ke: f64,

    /// Base blood:breath ratio
    pub bbr_base: f64,
    /// Linear correction per degree of breath temperature away from 34 °C
    pub bbr_temp_coeff: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            ka: 2.4,
            meal_factor: 1.0,
            carbonation_factor: 1.0,
            elimination_mode: EliminationMode::Saturable,
            vmax: 0.20,
            km: 0.15,
            beta: 0.18,
            ke: 0.15,
            bbr_base: 2100.0,
            bbr_temp_coeff: 0.0,
        }
    }
}

impl ModelConfig {
    /// Absorption constant after meal and carbonation adjustment
    pub fn base_absorption(&self) -> f64 {
        self.ka * self.meal_factor * self.carbonation_factor
    }

    /// The active elimination law, without tolerance scaling
    pub fn elimination_law(&self) -> EliminationLaw {
        match self.elimination_mode {
            EliminationMode::Saturable => EliminationLaw::Saturable {
                vmax: self.vmax,
                km: self.km,
            },
            EliminationMode::ConstantRate => EliminationLaw::ConstantRate { beta: self.beta },
            EliminationMode::Proportional => EliminationLaw::Proportional { ke: self.ke },
        }
    }

    /// Validate the configuration
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let non_negative = [
            ("ka", self.ka),
            ("meal_factor", self.meal_factor),
            ("carbonation_factor", self.carbonation_factor),
            ("vmax", self.vmax),
            ("km", self.km),
            ("beta", self.beta),
            ("ke", self.ke),
            ("bbr_base", self.bbr_base),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if !self.bbr_temp_coeff.is_finite() {
            errors.push("bbr_temp_coeff must be finite".to_string());
        }

        errors
    }
}

// ============================================================================
// Intake Types
// ============================================================================

/// One drink
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IntakeEvent {
    /// Hours from the start of the simulation
    pub time_h: f64,
    pub volume_ml: f64,
    /// Catalog name, looked up case-insensitively
    pub beverage: String,
    /// Explicit alcohol fraction, takes priority over the catalog
    #[serde(default)]
    pub abv: Option<f64>,
    /// Per-drink multiplier on the absorption constant
    #[serde(default = "default_absorption_multiplier")]
    pub absorption_multiplier: f64,
}

fn default_absorption_multiplier() -> f64 {
    1.0
}

impl IntakeEvent {
    pub fn new(time_h: f64, volume_ml: f64, beverage: impl Into<String>) -> Self {
        Self {
            time_h,
            volume_ml,
            beverage: beverage.into(),
            abv: None,
            absorption_multiplier: default_absorption_multiplier(),
        }
    }

    pub fn with_abv(mut self, abv: f64) -> Self {
        self.abv = Some(abv);
        self
    }

    pub fn with_absorption_multiplier(mut self, multiplier: f64) -> Self {
        self.absorption_multiplier = multiplier;
        self
    }

    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.time_h.is_finite() && self.time_h >= 0.0) {
            errors.push(format!("time_h must be non-negative, got {}", self.time_h));
        }
        if !(self.volume_ml.is_finite() && self.volume_ml > 0.0) {
            errors.push(format!("volume_ml must be positive, got {}", self.volume_ml));
        }
        if self.beverage.trim().is_empty() && self.abv.is_none() {
            errors.push("beverage is empty and no abv given".to_string());
        }
        if let Some(abv) = self.abv {
            if !(abv > 0.0 && abv <= 1.0) {
                errors.push(format!("abv must be in (0, 1], got {}", abv));
            }
        }
        if !(self.absorption_multiplier.is_finite() && self.absorption_multiplier >= 0.0) {
            errors.push(format!(
                "absorption_multiplier must be non-negative, got {}",
                self.absorption_multiplier
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sex_parsing() {
        assert_eq!("Male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("h".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("mujer".parse::<Sex>().unwrap(), Sex::Female);
        assert!("x".parse::<Sex>().is_err());
    }

    #[test]
    fn test_fixed_ratio_volume() {
        let subject = Subject {
            weight_kg: 80.0,
            vd_method: VdMethod::FixedRatio,
            widmark_r: 0.7,
            ..Subject::default()
        };
        assert_relative_eq!(subject.volume_of_distribution(), 56.0, epsilon = 1e-12);
    }

    #[test]
    fn test_watson_volume_matches_physiology() {
        let subject = Subject::default();
        let expected = physiology::total_body_water_liters(Sex::Male, 35.0, 175.0, 70.0);
        assert_eq!(subject.volume_of_distribution(), expected);
    }

    #[test]
    fn test_volume_not_cached() {
        let mut subject = Subject::default();
        let before = subject.volume_of_distribution();
        subject.weight_kg += 10.0;
        assert!(subject.volume_of_distribution() > before);
    }

    #[test]
    fn test_subject_validation() {
        assert!(Subject::default().validate().is_empty());

        let bad = Subject {
            weight_kg: 0.0,
            height_cm: -1.0,
            ..Subject::default()
        };
        let errors = bad.validate();
        assert!(errors.iter().any(|e| e.contains("weight_kg")));
        assert!(errors.iter().any(|e| e.contains("height_cm")));
    }

    #[test]
    fn test_tolerance_clamped() {
        let subject = Subject {
            habitual_level: 3.0,
            ..Subject::default()
        };
        assert_eq!(subject.tolerance(), 1.0);
    }

    #[test]
    fn test_base_absorption() {
        let config = ModelConfig {
            ka: 2.4,
            meal_factor: 0.8,
            carbonation_factor: 1.1,
            ..ModelConfig::default()
        };
        assert_relative_eq!(config.base_absorption(), 2.112, epsilon = 1e-12);
    }

    #[test]
    fn test_elimination_law_selection() {
        let mut config = ModelConfig::default();
        assert_eq!(
            config.elimination_law(),
            EliminationLaw::Saturable { vmax: 0.20, km: 0.15 }
        );

        config.elimination_mode = EliminationMode::ConstantRate;
        assert_eq!(config.elimination_law(), EliminationLaw::ConstantRate { beta: 0.18 });

        config.elimination_mode = EliminationMode::Proportional;
        assert_eq!(config.elimination_law(), EliminationLaw::Proportional { ke: 0.15 });
    }

    #[test]
    fn test_tolerance_scaling() {
        let law = EliminationLaw::Saturable { vmax: 0.2, km: 0.15 }.with_tolerance(0.5);
        match law {
            EliminationLaw::Saturable { vmax, km } => {
                assert_relative_eq!(vmax, 0.26, epsilon = 1e-12);
                assert_relative_eq!(km, 0.165, epsilon = 1e-12);
            }
            _ => panic!("law changed variant"),
        }

        match (EliminationLaw::ConstantRate { beta: 0.18 }).with_tolerance(1.0) {
            EliminationLaw::ConstantRate { beta } => assert_relative_eq!(beta, 0.252, epsilon = 1e-12),
            _ => panic!("law changed variant"),
        }

        let law = EliminationLaw::Proportional { ke: 0.15 }.with_tolerance(1.0);
        assert_eq!(law, EliminationLaw::Proportional { ke: 0.15 });
    }

    #[test]
    fn test_km_floor() {
        let law = EliminationLaw::Saturable { vmax: 0.2, km: 0.0 }.with_tolerance(0.0);
        assert_eq!(law, EliminationLaw::Saturable { vmax: 0.2, km: 1e-6 });
    }

    #[test]
    fn test_elimination_rates() {
        let vd = 40.0;
        let mass = 20.0; // 0.5 g/L
        let mm = EliminationLaw::Saturable { vmax: 0.2, km: 0.5 };
        assert_relative_eq!(mm.rate(mass, vd), 0.1 * vd, epsilon = 1e-12);

        let zero = EliminationLaw::ConstantRate { beta: 0.18 };
        assert_relative_eq!(zero.rate(mass, vd), 7.2, epsilon = 1e-12);

        let first = EliminationLaw::Proportional { ke: 0.15 };
        assert_relative_eq!(first.rate(mass, vd), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("mm".parse::<EliminationMode>().unwrap(), EliminationMode::Saturable);
        assert_eq!(
            "constant-rate".parse::<EliminationMode>().unwrap(),
            EliminationMode::ConstantRate
        );
        assert_eq!("ke".parse::<EliminationMode>().unwrap(), EliminationMode::Proportional);
        assert!("fast".parse::<EliminationMode>().is_err());
    }

    #[test]
    fn test_intake_builder_and_validation() {
        let intake = IntakeEvent::new(0.5, 330.0, "beer").with_absorption_multiplier(0.9);
        assert_eq!(intake.abv, None);
        assert_eq!(intake.absorption_multiplier, 0.9);
        assert!(intake.validate().is_empty());

        let bad = IntakeEvent::new(-1.0, 0.0, "beer").with_abv(1.5);
        assert_eq!(bad.validate().len(), 3);
    }

    #[test]
    fn test_config_validation_flags_negative_rates() {
        let config = ModelConfig {
            ka: -1.0,
            ..ModelConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("ka"));
    }
}
