//! Error types for the brac_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for brac_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An intake refers to a beverage with no catalog entry and no ABV override
    #[error("Unknown beverage '{beverage}' in intake #{index}")]
    UnknownBeverage { index: usize, beverage: String },

    /// Volume of distribution is zero, negative or not finite
    #[error("Non-physical volume of distribution: {0} L")]
    InvalidVolume(f64),

    /// Duration, step or sample count out of range
    #[error("Parameter out of range: {0}")]
    ParameterRange(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),
}
