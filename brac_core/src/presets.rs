//! Built-in drinking scenarios.

use crate::{IntakeEvent, ModelConfig};

/// A named intake pattern with its absorption adjustments
#[derive(Clone, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub meal_factor: Option<f64>,
    pub carbonation_factor: Option<f64>,
    pub intakes: Vec<IntakeEvent>,
}

impl Preset {
    /// Write this preset's meal and carbonation factors into `config`
    pub fn apply(&self, config: &mut ModelConfig) {
        if let Some(meal) = self.meal_factor {
            config.meal_factor = meal;
        }
        if let Some(carbonation) = self.carbonation_factor {
            config.carbonation_factor = carbonation;
        }
    }
}

/// All built-in presets, in display order
pub fn list_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "liquor-fasting",
            description: "Liquor on an empty stomach (4 x 40 ml)",
            meal_factor: Some(0.8),
            carbonation_factor: Some(1.1),
            intakes: [0.0, 0.75, 1.5, 2.15]
                .into_iter()
                .map(|t| IntakeEvent::new(t, 40.0, "liquor"))
                .collect(),
        },
        Preset {
            name: "beer-meal",
            description: "Beer (330 ml) with a meal",
            meal_factor: Some(0.7),
            carbonation_factor: Some(1.2),
            intakes: vec![IntakeEvent::new(0.0, 330.0, "beer").with_absorption_multiplier(0.9)],
        },
        Preset {
            name: "wine-dinner",
            description: "Wine (2 x 150 ml) with a light dinner",
            meal_factor: Some(0.8),
            carbonation_factor: Some(1.0),
            intakes: vec![
                IntakeEvent::new(0.0, 150.0, "wine"),
                IntakeEvent::new(0.75, 150.0, "wine"),
            ],
        },
        Preset {
            name: "single-shot",
            description: "A single 40 ml shot of liquor",
            meal_factor: None,
            carbonation_factor: None,
            intakes: vec![IntakeEvent::new(0.0, 40.0, "liquor")],
        },
    ]
}

/// Look up a preset by name (case-insensitive)
pub fn find_preset(name: &str) -> Option<Preset> {
    let name = name.trim().to_lowercase();
    list_presets().into_iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    #[test]
    fn test_presets_use_known_beverages() {
        for preset in list_presets() {
            for intake in &preset.intakes {
                assert!(
                    default_catalog().contains(&intake.beverage),
                    "{} uses unknown beverage {}",
                    preset.name,
                    intake.beverage
                );
                assert!(intake.validate().is_empty());
            }
        }
    }

    #[test]
    fn test_find_preset() {
        let preset = find_preset("Beer-Meal").unwrap();
        assert_eq!(preset.intakes.len(), 1);
        assert_eq!(preset.intakes[0].absorption_multiplier, 0.9);
        assert!(find_preset("tequila-night").is_none());
    }

    #[test]
    fn test_apply_overrides_factors() {
        let mut config = ModelConfig::default();
        find_preset("liquor-fasting").unwrap().apply(&mut config);
        assert_eq!(config.meal_factor, 0.8);
        assert_eq!(config.carbonation_factor, 1.1);

        let mut config = ModelConfig {
            meal_factor: 0.5,
            ..ModelConfig::default()
        };
        find_preset("single-shot").unwrap().apply(&mut config);
        assert_eq!(config.meal_factor, 0.5);
    }

    #[test]
    fn test_preset_names_unique() {
        let presets = list_presets();
        let mut names: Vec<_> = presets.iter().map(|p| p.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), presets.len());
    }
}
