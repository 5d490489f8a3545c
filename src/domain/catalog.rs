//! Indicator catalog: the static descriptor lookup table.

use std::collections::HashSet;

use crate::domain::{Category, Correlation, SeriesDescriptor, UnitMode};
use crate::error::CatalogError;

use Category::{Employment, General, Inflation, Revenues};
use Correlation::{Direct, Inverse};
use UnitMode::{Level, YearOverYear as Yoy};

/// Built-in hospitality indicator set:
/// `(category, id, name, correlation, unit mode, is_percent)`.
const BUILTIN: &[(Category, &str, &str, Correlation, UnitMode, bool)] = &[
    (Employment, "USLAH", "All Employees, Leisure and Hospitality", Direct, Level, false),
    (Employment, "CES7000000003", "Average Hourly Earnings", Direct, Level, false),
    (Employment, "AWHAELAH", "Average Weekly Hours", Direct, Level, false),
    (Employment, "JTS7000JOL", "Job Openings", Direct, Level, false),
    (Employment, "IHLIDXUSTPHOTO", "Job Postings on Indeed", Direct, Level, false),
    (Employment, "LNU04032241", "Unemployment Rate", Inverse, Level, true),
    (Revenues, "DRCARC1Q027SBEA", "Recreation Services Expenditures", Direct, Level, false),
    (Revenues, "DFSARC1Q027SBEA", "Food Services Expenditures", Direct, Level, false),
    (Inflation, "PCU721110721110", "PPI Hotels and Motels", Inverse, Yoy, true),
    (Inflation, "PCU721110721110103", "PPI Luxury Hotels", Inverse, Yoy, true),
    (Inflation, "PCU5615105615102111", "PPI Travel Agencies Hotel Bookings", Inverse, Yoy, true),
    (General, "UMCSENT", "Consumer Sentiment", Direct, Level, false),
    (General, "PI", "Personal Income", Direct, Level, false),
    (General, "PCE", "Personal Consumption Expenditures", Direct, Level, false),
    (General, "GDP", "Gross Domestic Product", Direct, Level, false),
    (General, "UNRATE", "Unemployment Rate", Inverse, Level, true),
    (General, "DSPI", "Disposable Personal Income", Direct, Level, false),
    (General, "CPIAUCSL", "Consumer Price Index", Inverse, Yoy, true),
];

/// Immutable descriptor table, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: Vec<SeriesDescriptor>,
}

impl Catalog {
    /// Validate and build a catalog.
    ///
    /// Identifiers and names must be non-empty and an identifier may appear at
    /// most once per category.
    pub fn new(descriptors: Vec<SeriesDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for d in &descriptors {
            if d.id.trim().is_empty() {
                return Err(CatalogError::EmptyIdentifier { category: d.category });
            }
            if d.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { id: d.id.clone() });
            }
            if !seen.insert((d.category, d.id.as_str())) {
                return Err(CatalogError::Duplicate {
                    category: d.category,
                    id: d.id.clone(),
                });
            }
        }
        Ok(Self { descriptors })
    }

    /// The compiled-in indicator set.
    pub fn builtin() -> Self {
        let descriptors = BUILTIN
            .iter()
            .map(|&(category, id, name, correlation, unit_mode, is_percent)| SeriesDescriptor {
                id: id.to_string(),
                name: name.to_string(),
                category,
                correlation,
                unit_mode,
                is_percent,
            })
            .collect();
        Self { descriptors }
    }

    pub fn descriptors(&self) -> &[SeriesDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &SeriesDescriptor> {
        self.descriptors.iter().filter(move |d| d.category == category)
    }

    pub fn lookup(&self, category: Category, id: &str) -> Option<&SeriesDescriptor> {
        self.in_category(category).find(|d| d.id == id)
    }

    /// Friendly name, falling back to the identifier itself.
    pub fn display_name<'a>(&'a self, category: Category, id: &'a str) -> &'a str {
        self.lookup(category, id).map(|d| d.name.as_str()).unwrap_or(id)
    }
}
