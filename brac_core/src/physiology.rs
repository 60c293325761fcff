//! Physiological conversions used to turn drinks into ethanol mass and
//! bodies into a volume of distribution.

use crate::Sex;

/// Density of ethanol in g/mL
pub const ETHANOL_DENSITY_G_PER_ML: f64 = 0.789;

/// Grams of ethanol in `volume_ml` of a drink with alcohol fraction `abv` (0-1)
pub fn ethanol_mass(volume_ml: f64, abv: f64) -> f64 {
    volume_ml * abv * ETHANOL_DENSITY_G_PER_ML
}

/// Total body water in liters, Watson regression.
///
/// The male equation carries an age term, the female one does not.
/// No bounds checking is done: non-adult or extreme anthropometrics
/// can produce non-physical (even negative) volumes.
pub fn total_body_water_liters(sex: Sex, age_years: f64, height_cm: f64, weight_kg: f64) -> f64 {
    match sex {
        Sex::Male => 2.447 - 0.09516 * age_years + 0.1074 * height_cm + 0.3362 * weight_kg,
        Sex::Female => -2.097 + 0.1069 * height_cm + 0.2466 * weight_kg,
    }
}
