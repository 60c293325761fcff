//! Simulation engine: GI compartment feeding a central compartment.
//!
//! This module implements the forward simulation:
//! - Each intake becomes a dose record that loads into the GI compartment
//!   at its ingestion time and releases mass with first-order kinetics
//! - The central compartment loses mass through the active elimination law
//! - Blood concentration is mapped to breath concentration through the
//!   effective blood:breath ratio
//!
//! Integration is explicit Euler on a fixed step. Accuracy depends on the
//! caller choosing a step that is small relative to `1 / ka` and to the
//! elimination time scale; no step refinement is attempted.

use crate::{
    physiology, BeverageCatalog, EliminationLaw, Error, IntakeEvent, ModelConfig, Result, Subject,
};

/// Breath temperature at which the base blood:breath ratio applies
pub const REFERENCE_BREATH_TEMP_C: f64 = 34.0;

/// Lower bound on the effective blood:breath ratio
pub const MIN_BBR: f64 = 1000.0;

/// Upper bound on samples per run, keeps the loop finite
pub const MAX_SAMPLES: usize = 10_000_000;

/// Time series produced by one simulation run
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationOutput {
    /// Sample times in hours
    pub times: Vec<f64>,
    /// Blood alcohol concentration, g/L
    pub blood: Vec<f64>,
    /// Breath alcohol concentration, mg/L of air
    pub breath: Vec<f64>,
    /// Blood:breath ratio used for the breath series
    pub effective_bbr: f64,
    /// Volume of distribution used for the run, L
    pub volume_of_distribution: f64,
    /// Integration step, hours
    pub step_h: f64,
}

impl SimulationOutput {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Per-intake state owned by a single run
#[derive(Clone, Debug)]
struct DoseRecord {
    time_h: f64,
    dose_g: f64,
    pending_g: f64,
    ka: f64,
    loaded: bool,
}

/// Blood:breath ratio after thermal correction, floored at [`MIN_BBR`]
pub fn effective_bbr(subject: &Subject, config: &ModelConfig) -> f64 {
    let bbr = config.bbr_base
        * (1.0 + config.bbr_temp_coeff * (subject.breath_temp_c - REFERENCE_BREATH_TEMP_C));
    bbr.max(MIN_BBR)
}

/// Convert BAC (g/L) to BrAC (mg/L air)
pub fn breath_from_blood(bac_g_per_l: f64, bbr: f64) -> f64 {
    bac_g_per_l * 1000.0 / bbr
}

/// Number of samples on `[0, duration_h)` at `step_h`
pub fn sample_count(duration_h: f64, step_h: f64) -> Result<usize> {
    if !(duration_h.is_finite() && duration_h > 0.0) {
        return Err(Error::ParameterRange(format!(
            "duration must be positive, got {} h",
            duration_h
        )));
    }
    if !(step_h.is_finite() && step_h > 0.0) {
        return Err(Error::ParameterRange(format!(
            "step must be positive, got {} h",
            step_h
        )));
    }

    let n = (duration_h / step_h).ceil();
    if !n.is_finite() || n > MAX_SAMPLES as f64 {
        return Err(Error::ParameterRange(format!(
            "{} h at {} h steps exceeds {} samples",
            duration_h, step_h, MAX_SAMPLES
        )));
    }

    Ok(n as usize)
}

/// Simulate blood and breath alcohol concentration for a series of intakes.
///
/// Samples are taken at `0, step_h, 2·step_h, …` strictly below
/// `duration_h`, giving `ceil(duration_h / step_h)` samples.
///
/// # Errors
/// - [`Error::ParameterRange`] for a non-positive duration or step
/// - [`Error::InvalidVolume`] when the subject's volume of distribution is not positive
/// - [`Error::UnknownBeverage`] when an intake has no ABV override and no catalog entry
pub fn simulate(
    subject: &Subject,
    events: &[IntakeEvent],
    config: &ModelConfig,
    catalog: &BeverageCatalog,
    duration_h: f64,
    step_h: f64,
) -> Result<SimulationOutput> {
    let n = sample_count(duration_h, step_h)?;

    let vd = subject.volume_of_distribution();
    if !(vd.is_finite() && vd > 0.0) {
        return Err(Error::InvalidVolume(vd));
    }

    let ka_base = config.base_absorption();
    let mut doses = prepare_doses(events, catalog, ka_base)?;

    let law = config.elimination_law().with_tolerance(subject.tolerance());
    let bbr = effective_bbr(subject, config);

    tracing::debug!(
        vd,
        ka_base,
        bbr,
        ?law,
        doses = doses.len(),
        samples = n,
        "Starting simulation"
    );

    let mut times = Vec::with_capacity(n);
    let mut blood = Vec::with_capacity(n);
    let mut breath = Vec::with_capacity(n);

    let mut central_g = 0.0_f64;

    for i in 0..n {
        let t = i as f64 * step_h;

        load_due_doses(&mut doses, t);
        let absorption = absorb(&mut doses, step_h);
        let elimination = capped_elimination(&law, central_g, vd, step_h);

        central_g = (central_g + (absorption - elimination) * step_h).max(0.0);

        let bac = central_g / vd;
        times.push(t);
        blood.push(bac);
        breath.push(breath_from_blood(bac, bbr));
    }

    tracing::debug!(
        final_central_g = central_g,
        remaining_gi_g = doses.iter().map(|d| d.pending_g).sum::<f64>(),
        "Simulation finished"
    );

    Ok(SimulationOutput {
        times,
        blood,
        breath,
        effective_bbr: bbr,
        volume_of_distribution: vd,
        step_h,
    })
}

/// Turn intakes into dose records, resolving each ABV
fn prepare_doses(
    events: &[IntakeEvent],
    catalog: &BeverageCatalog,
    ka_base: f64,
) -> Result<Vec<DoseRecord>> {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let abv = event
                .abv
                .or_else(|| catalog.abv(&event.beverage))
                .ok_or_else(|| Error::UnknownBeverage {
                    index,
                    beverage: event.beverage.clone(),
                })?;

            Ok(DoseRecord {
                time_h: event.time_h,
                dose_g: physiology::ethanol_mass(event.volume_ml, abv),
                pending_g: 0.0,
                ka: ka_base * event.absorption_multiplier,
                loaded: false,
            })
        })
        .collect()
}

/// Move each dose that is due into the GI compartment, once
fn load_due_doses(doses: &mut [DoseRecord], t: f64) {
    for dose in doses.iter_mut().filter(|d| !d.loaded && t >= d.time_h) {
        dose.pending_g += dose.dose_g;
        dose.loaded = true;
        tracing::trace!(t, time_h = dose.time_h, grams = dose.dose_g, "Dose loaded");
    }
}

/// Total first-order release from the GI compartment this step, g/h
///
/// A dose that would be overdrawn releases exactly what it has left.
fn absorb(doses: &mut [DoseRecord], step_h: f64) -> f64 {
    let mut total = 0.0;
    for dose in doses.iter_mut().filter(|d| d.pending_g > 0.0) {
        let mut rate = dose.ka * dose.pending_g;
        dose.pending_g -= rate * step_h;
        if dose.pending_g < 0.0 {
            rate += dose.pending_g / step_h;
            dose.pending_g = 0.0;
        }
        total += rate;
    }
    total
}

/// Elimination rate in g/h, never removing more than the central mass
fn capped_elimination(law: &EliminationLaw, central_g: f64, vd: f64, step_h: f64) -> f64 {
    if central_g > 0.0 {
        law.rate(central_g, vd).min(central_g / step_h)
    } else {
        0.0
    }
}
