#![forbid(unsafe_code)]

//! Core model and simulation engine for the brac alcohol simulator.
//!
//! This crate provides:
//! - Domain types (subject, model configuration, intakes)
//! - Physiological conversions and the beverage catalog
//! - The GI → central compartment simulation engine
//! - Summary metrics, presets, CSV export and configuration files
//!
//! Results are estimates for exploration and teaching only, not a medical
//! or legal determination.

pub mod types;
pub mod error;
pub mod physiology;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod engine;
pub mod summary;
pub mod presets;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, default_catalog, BeverageCatalog};
pub use config::{Config, SimulationConfig};
pub use engine::{simulate, SimulationOutput};
pub use summary::{Limits, Peak, Summary};
pub use presets::{find_preset, list_presets, Preset};
pub use export::write_csv;
