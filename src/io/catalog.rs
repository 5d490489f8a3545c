//! Read indicator catalogs from JSON.
//!
//! The file is a nested mapping, category -> series id -> attributes:
//!
//! ```json
//! {
//!   "Employment": {
//!     "USLAH": { "name": "All Employees, Leisure and Hospitality", "correlation": "Direct" },
//!     "LNU04032241": { "name": "Unemployment Rate", "correlation": "Inverse", "is_percent": true }
//!   },
//!   "Inflation": {
//!     "CPIAUCSL": {
//!       "name": "Consumer Price Index",
//!       "correlation": "Inverse",
//!       "unit_mode": "pc1",
//!       "is_percent": true
//!     }
//!   }
//! }
//! ```
//!
//! `unit_mode` defaults to `level` (unknown values also fall back to `level`),
//! `correlation` to `Direct`, `is_percent` to `false`. Key order is kept.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{Catalog, Category, Correlation, SeriesDescriptor, UnitMode};
use crate::error::{AppError, CatalogError};

#[derive(Debug, Deserialize)]
struct DescriptorEntry {
    name: String,
    #[serde(default)]
    correlation: Correlation,
    #[serde(default)]
    unit_mode: UnitMode,
    #[serde(default)]
    is_percent: bool,
}

/// Read and validate a catalog file.
pub fn read_catalog_json(path: &Path) -> Result<Catalog, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| {
            AppError::new(2, format!("Failed to open catalog '{}': {e}", path.display()))
        })?;
    parse_catalog_json(&text)
}

pub fn parse_catalog_json(text: &str) -> Result<Catalog, AppError> {
    let root: Map<String, Value> = serde_json::from_str(text)
        .map_err(|e| AppError::new(2, format!("Invalid catalog JSON: {e}")))?;

    let mut descriptors = Vec::new();
    for (category_name, entries) in root {
        let category = Category::from_name(&category_name)
            .ok_or_else(|| CatalogError::UnknownCategory(category_name.clone()))?;
        let entries: Map<String, Value> = serde_json::from_value(entries).map_err(|e| {
            AppError::new(2, format!("Catalog category '{category_name}' must be an object: {e}"))
        })?;

        for (id, entry) in entries {
            let entry: DescriptorEntry = serde_json::from_value(entry)
                .map_err(|e| AppError::new(2, format!("Invalid catalog entry '{id}': {e}")))?;
            descriptors.push(SeriesDescriptor {
                id,
                name: entry.name,
                category,
                correlation: entry.correlation,
                unit_mode: entry.unit_mode,
                is_percent: entry.is_percent,
            });
        }
    }

    Ok(Catalog::new(descriptors)?)
}
