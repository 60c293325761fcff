//! Summary metrics over a simulated time series.
//!
//! Peak exposure and how long a series stays above reference limits.
//! Limits are informational only; nothing here feeds back into the engine.

use crate::SimulationOutput;
use serde::{Deserialize, Serialize};

/// Reference thresholds for reporting
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Limits {
    /// Breath limit, mg/L of air
    pub brac_mg_per_l: f64,
    /// Blood limit, g/L
    pub bac_g_per_l: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            brac_mg_per_l: 0.25,
            bac_g_per_l: 0.5,
        }
    }
}

/// The breath-concentration maximum of a run
#[derive(Clone, Debug, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub time_h: f64,
    pub brac_mg_per_l: f64,
    pub bac_g_per_l: f64,
}

/// First sample holding the maximum breath concentration
pub fn peak(output: &SimulationOutput) -> Option<Peak> {
    let mut best: Option<usize> = None;
    for (i, &value) in output.breath.iter().enumerate() {
        if best.map_or(true, |b| value > output.breath[b]) {
            best = Some(i);
        }
    }

    best.map(|index| Peak {
        index,
        time_h: output.times[index],
        brac_mg_per_l: output.breath[index],
        bac_g_per_l: output.blood[index],
    })
}

/// Hours a series spends strictly above `limit`
pub fn time_above(series: &[f64], limit: f64, step_h: f64) -> f64 {
    series.iter().filter(|&&v| v > limit).count() as f64 * step_h
}

/// Time of the last sample strictly above `limit`
pub fn last_time_above(series: &[f64], times: &[f64], limit: f64) -> Option<f64> {
    series
        .iter()
        .zip(times)
        .rev()
        .find(|(v, _)| **v > limit)
        .map(|(_, t)| *t)
}

/// Headline numbers for a run
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub peak: Option<Peak>,
    pub hours_above_brac_limit: f64,
    pub hours_above_bac_limit: f64,
    /// After this time breath concentration stays at or below its limit.
    /// `None` if it never went above, or is still above at the last sample.
    pub brac_clear_after_h: Option<f64>,
    /// Last sample still above the breath limit
    pub brac_over_limit_at_end: bool,
    pub limits: Limits,
}

impl Summary {
    pub fn from_output(output: &SimulationOutput, limits: &Limits) -> Self {
        let brac_over_limit_at_end = output
            .breath
            .last()
            .map_or(false, |&v| v > limits.brac_mg_per_l);
        let brac_clear_after_h = if brac_over_limit_at_end {
            None
        } else {
            last_time_above(&output.breath, &output.times, limits.brac_mg_per_l)
                .map(|t| t + output.step_h)
        };

        Self {
            peak: peak(output),
            hours_above_brac_limit: time_above(&output.breath, limits.brac_mg_per_l, output.step_h),
            hours_above_bac_limit: time_above(&output.blood, limits.bac_g_per_l, output.step_h),
            brac_clear_after_h,
            brac_over_limit_at_end,
            limits: limits.clone(),
        }
    }
}
