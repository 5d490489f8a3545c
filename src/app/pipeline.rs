//! Shared reload logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! catalog -> fetch each series (sequentially) -> align per category
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::data::{align, CategoryTable, SeriesSource};
use crate::domain::{Catalog, Category};
use crate::error::FetchError;

/// A series that could not be loaded during a reload.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFailure {
    pub category: Category,
    pub identifier: String,
    pub error: FetchError,
}

/// All data produced by one reload. Owned by the caller and replaced wholesale
/// by the next reload.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Upper bound used for every request.
    pub as_of: NaiveDate,
    /// One table per category, in `Category::ALL` order (possibly empty).
    pub tables: Vec<CategoryTable>,
    pub failures: Vec<SeriesFailure>,
}

impl Dataset {
    pub fn table(&self, category: Category) -> Option<&CategoryTable> {
        self.tables.iter().find(|t| t.category() == category)
    }

    /// Number of series that loaded across all categories.
    pub fn series_count(&self) -> usize {
        self.tables.iter().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|t| t.is_empty())
    }
}

/// Reload every configured series, one request at a time.
///
/// Never fails: unavailable series are recorded in `Dataset::failures` and the
/// pass continues with the next identifier.
pub fn reload(source: &dyn SeriesSource, catalog: &Catalog, as_of: NaiveDate) -> Dataset {
    let mut tables = Vec::with_capacity(Category::ALL.len());
    let mut failures = Vec::new();

    for category in Category::ALL {
        let (table, mut category_failures) = reload_category(source, catalog, category, as_of);
        tables.push(table);
        failures.append(&mut category_failures);
    }

    info!(
        as_of = %as_of,
        loaded = tables.iter().map(|t| t.len()).sum::<usize>(),
        failed = failures.len(),
        "reload complete"
    );

    Dataset {
        as_of,
        tables,
        failures,
    }
}

/// Reload the series of a single category.
pub fn reload_category(
    source: &dyn SeriesSource,
    catalog: &Catalog,
    category: Category,
    as_of: NaiveDate,
) -> (CategoryTable, Vec<SeriesFailure>) {
    let mut results = Vec::new();
    let mut failures = Vec::new();

    for descriptor in catalog.in_category(category) {
        let result = source
            .fetch(&descriptor.id, descriptor.unit_mode, as_of)
            .and_then(|series| {
                if series.is_empty() {
                    Err(FetchError::Empty {
                        series_id: descriptor.id.clone(),
                    })
                } else {
                    Ok(series)
                }
            });
        match &result {
            Ok(series) => info!(
                series_id = %descriptor.id,
                name = %descriptor.name,
                months = series.len(),
                "loaded series"
            ),
            Err(err) => {
                warn!(series_id = %descriptor.id, name = %descriptor.name, error = %err, "failed to load series");
                failures.push(SeriesFailure {
                    category,
                    identifier: descriptor.id.clone(),
                    error: err.clone(),
                });
            }
        }
        results.push((descriptor.id.clone(), result));
    }

    let table = align(category, results);
    if table.is_empty() {
        warn!(category = %category, "no data for category");
    } else {
        info!(category = %category, series = table.len(), months = table.months().len(), "category aligned");
    }

    (table, failures)
}
