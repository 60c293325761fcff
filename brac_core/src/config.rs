//! Configuration and scenario file support for brac.
//!
//! Defaults are loaded from `$XDG_CONFIG_HOME/brac/config.toml`. A scenario
//! file has the same layout plus `[[intakes]]` entries.

use crate::{
    catalog::default_catalog, simulate, BeverageCatalog, Error, IntakeEvent, Limits, ModelConfig,
    Result, SimulationOutput, Subject,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration / scenario
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub subject: Subject,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub limits: Limits,

    /// Extra catalog entries, layered over the built-in beverages
    #[serde(default)]
    pub beverages: BeverageCatalog,

    #[serde(default)]
    pub intakes: Vec<IntakeEvent>,
}

/// Time grid configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_duration_h")]
    pub duration_h: f64,

    /// 0.0025 h is about 9 s
    #[serde(default = "default_step_h")]
    pub step_h: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_h: default_duration_h(),
            step_h: default_step_h(),
        }
    }
}

// Default value functions
fn default_duration_h() -> f64 {
    12.0
}

fn default_step_h() -> f64 {
    0.0025
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("brac")
            .join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Built-in beverages with this config's entries layered on top
    pub fn catalog(&self) -> BeverageCatalog {
        default_catalog().merged_with(&self.beverages)
    }

    /// Validate everything the simulation will consume
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let catalog = self.catalog();

        errors.extend(self.subject.validate().into_iter().map(|e| format!("subject: {}", e)));
        errors.extend(self.model.validate().into_iter().map(|e| format!("model: {}", e)));
        errors.extend(catalog.validate().into_iter().map(|e| format!("beverages: {}", e)));

        for (i, intake) in self.intakes.iter().enumerate() {
            errors.extend(
                intake
                    .validate()
                    .into_iter()
                    .map(|e| format!("intake #{}: {}", i, e)),
            );
            if intake.abv.is_none() && !catalog.contains(&intake.beverage) {
                errors.push(format!(
                    "intake #{}: beverage '{}' not in catalog",
                    i, intake.beverage
                ));
            }
        }

        if !(self.simulation.duration_h > 0.0) {
            errors.push(format!(
                "simulation: duration_h must be positive, got {}",
                self.simulation.duration_h
            ));
        }
        if !(self.simulation.step_h > 0.0) {
            errors.push(format!(
                "simulation: step_h must be positive, got {}",
                self.simulation.step_h
            ));
        }

        errors
    }

    /// Run the engine over this scenario
    pub fn simulate(&self) -> Result<SimulationOutput> {
        simulate(
            &self.subject,
            &self.intakes,
            &self.model,
            &self.catalog(),
            self.simulation.duration_h,
            self.simulation.step_h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EliminationMode, Sex, VdMethod};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulation.duration_h, 12.0);
        assert_eq!(config.simulation.step_h, 0.0025);
        assert_eq!(config.model.elimination_mode, EliminationMode::Saturable);
        assert!(config.intakes.is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.intakes.push(IntakeEvent::new(0.5, 150.0, "wine"));
        config.beverages.insert("cava", 0.115);

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[subject]
weight_kg = 62
height_cm = 180
age_years = 26
sex = "female"
habitual_level = 0.5

[model]
elimination_mode = "constant-rate"
meal_factor = 0.8

[[intakes]]
time_h = 0.0
volume_ml = 40
beverage = "licor"

[[intakes]]
time_h = 0.75
volume_ml = 330
beverage = "house lager"
abv = 0.055
absorption_multiplier = 0.9
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.subject.sex, Sex::Female);
        assert_eq!(config.subject.breath_temp_c, 34.0); // default
        assert_eq!(config.subject.vd_method, VdMethod::Watson); // default
        assert_eq!(config.model.elimination_mode, EliminationMode::ConstantRate);
        assert_eq!(config.model.ka, 2.4); // default
        assert_eq!(config.simulation.duration_h, 12.0); // default
        assert_eq!(config.intakes.len(), 2);
        assert_eq!(config.intakes[0].absorption_multiplier, 1.0);
        assert_eq!(config.intakes[1].abv, Some(0.055));
        assert!(config.validate().is_empty(), "{:?}", config.validate());
    }

    #[test]
    fn test_config_accepts_aliases() {
        let config: Config = toml::from_str(
            r#"
[subject]
sex = "hombre"

[model]
elimination_mode = "mm"
"#,
        )
        .unwrap();
        assert_eq!(config.subject.sex, Sex::Male);
        assert_eq!(config.model.elimination_mode, EliminationMode::Saturable);

        let config: Config =
            toml::from_str("[subject]\nsex = \"M\"\n[model]\nelimination_mode = \"zero\"\n").unwrap();
        assert_eq!(config.subject.sex, Sex::Male);
        assert_eq!(config.model.elimination_mode, EliminationMode::ConstantRate);

        let config: Config = toml::from_str("[subject]\nsex = \"mujer\"\n").unwrap();
        assert_eq!(config.subject.sex, Sex::Female);
    }

    #[test]
    fn test_config_rejects_unknown_sex() {
        let result: std::result::Result<Config, _> = toml::from_str("[subject]\nsex = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_extra_beverages_extend_catalog() {
        let toml_str = r#"
[beverages]
sidra = 0.05

[[intakes]]
time_h = 0.0
volume_ml = 500
beverage = "sidra"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog().abv("sidra"), Some(0.05));
        assert_eq!(config.catalog().abv("beer"), Some(0.05));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validation_reports_unknown_beverage() {
        let mut config = Config::default();
        config.intakes.push(IntakeEvent::new(0.0, 500.0, "kombucha"));
        config.simulation.step_h = 0.0;

        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("kombucha")));
        assert!(errors.iter().any(|e| e.contains("step_h")));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("brac").join("config.toml");

        let mut config = Config::default();
        config.limits.brac_mg_per_l = 0.15;
        config.intakes.push(IntakeEvent::new(0.0, 40.0, "shot"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_simulate_scenario() {
        let mut config = Config::default();
        config.simulation.duration_h = 2.0;
        config.simulation.step_h = 0.01;
        config.intakes.push(IntakeEvent::new(0.0, 40.0, "liquor"));

        let out = config.simulate().unwrap();
        assert_eq!(out.len(), 200);
        assert!(out.blood.iter().any(|&c| c > 0.0));
    }
}
