//! Beverage catalog: beverage name to alcohol-by-volume fraction.
//!
//! The engine never consults ambient state for ABV; a catalog is passed
//! into every simulation explicitly.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cached default catalog - built once and shared by every simulation
static DEFAULT_CATALOG: Lazy<BeverageCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn default_catalog() -> &'static BeverageCatalog {
    &DEFAULT_CATALOG
}

/// Mapping from lowercase beverage name to ABV fraction in (0, 1]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BeverageCatalog {
    entries: BTreeMap<String, f64>,
}

/// Builds the default catalog of common drinks (English and Spanish names)
///
/// **Note**: For simulations, prefer `default_catalog()` which returns a
/// cached reference. Use this to start a custom catalog.
pub fn build_default_catalog() -> BeverageCatalog {
    let mut catalog = BeverageCatalog::default();

    catalog.insert("beer", 0.05);
    catalog.insert("wine", 0.12);
    catalog.insert("liquor", 0.40);
    catalog.insert("absenta", 0.9);
    catalog.insert("absinthe", 0.9);
    catalog.insert("cerveza", 0.05);
    catalog.insert("vino", 0.12);
    catalog.insert("licor", 0.45);
    catalog.insert("chupito", 0.3);
    catalog.insert("shot", 0.3);

    catalog
}

impl BeverageCatalog {
    /// Add or replace an entry; the name is lowercased
    pub fn insert(&mut self, name: &str, abv: f64) -> Option<f64> {
        self.entries.insert(normalize(name), abv)
    }

    /// Look up a beverage's ABV fraction, case-insensitively
    pub fn abv(&self, name: &str) -> Option<f64> {
        self.entries.get(&normalize(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.abv(name).is_some()
    }

    /// Beverage names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// (name, abv) pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of this catalog with `extra` entries layered on top
    pub fn merged_with(&self, extra: &BeverageCatalog) -> BeverageCatalog {
        let mut merged = self.clone();
        for (name, abv) in extra.iter() {
            merged.insert(name, abv);
        }
        merged
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, abv) in &self.entries {
            if name.is_empty() {
                errors.push("Beverage has empty name".to_string());
            }
            if name != &normalize(name) {
                errors.push(format!("Beverage key '{}' is not normalized", name));
            }
            if !(*abv > 0.0 && *abv <= 1.0) {
                errors.push(format!("Beverage '{}': abv {} outside (0, 1]", name, abv));
            }
        }

        errors
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
