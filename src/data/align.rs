//! Combine independently-dated series of one category into a single table.

use std::collections::BTreeSet;

use crate::domain::{Category, Month, ObservationSeries};
use crate::error::FetchError;

/// All series of one category that loaded, in configuration order.
///
/// Each column keeps its own first/last month; nothing is truncated to a common
/// range.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    category: Category,
    columns: Vec<(String, ObservationSeries)>,
}

/// One month of the outer-joined row view; `None` where a series has no value.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub month: Month,
    pub values: Vec<Option<f64>>,
}

impl CategoryTable {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            columns: Vec::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// "No data for category".
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[(String, ObservationSeries)] {
        &self.columns
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(id, _)| id.as_str())
    }

    pub fn series(&self, id: &str) -> Option<&ObservationSeries> {
        self.columns.iter().find(|(c, _)| c == id).map(|(_, s)| s)
    }

    /// Union of every month present in any series, ascending.
    pub fn months(&self) -> Vec<Month> {
        let set: BTreeSet<Month> = self
            .columns
            .iter()
            .flat_map(|(_, s)| s.points().iter().map(|(m, _)| *m))
            .collect();
        set.into_iter().collect()
    }

    pub fn first_month(&self) -> Option<Month> {
        self.columns.iter().filter_map(|(_, s)| s.first_month()).min()
    }

    pub fn last_month(&self) -> Option<Month> {
        self.columns.iter().filter_map(|(_, s)| s.last_month()).max()
    }

    /// Outer-joined rows keyed by month, one cell per column.
    pub fn rows(&self) -> Vec<TableRow> {
        self.months()
            .into_iter()
            .map(|month| TableRow {
                month,
                values: self.columns.iter().map(|(_, s)| s.get(month)).collect(),
            })
            .collect()
    }
}

/// Build a category table from per-identifier fetch results.
///
/// Failed or empty series are dropped entirely. When an identifier repeats,
/// the first successful occurrence is kept.
pub fn align<I>(category: Category, results: I) -> CategoryTable
where
    I: IntoIterator<Item = (String, Result<ObservationSeries, FetchError>)>,
{
    let mut table = CategoryTable::empty(category);
    for (id, result) in results {
        let Ok(series) = result else {
            continue;
        };
        if series.is_empty() || table.series(&id).is_some() {
            continue;
        }
        table.columns.push((id, series));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn failed(id: &str) -> Result<ObservationSeries, FetchError> {
        Err(FetchError::Empty {
            series_id: id.to_string(),
        })
    }

    #[test]
    fn failed_series_are_dropped() {
        let table = align(
            Category::Employment,
            vec![
                ("A".to_string(), Ok(ObservationSeries::from_values(month(2024, 1), &[1.0, 2.0]))),
                ("B".to_string(), failed("B")),
                ("C".to_string(), Ok(ObservationSeries::default())),
            ],
        );
        assert_eq!(table.identifiers().collect::<Vec<_>>(), vec!["A"]);
        assert!(table.series("B").is_none());
    }

    #[test]
    fn zero_successes_is_an_empty_table() {
        let table = align(Category::Inflation, vec![("X".to_string(), failed("X"))]);
        assert!(table.is_empty());
        assert_eq!(table.category(), Category::Inflation);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn rows_are_the_outer_union_of_months() {
        let a = ObservationSeries::from_values(month(2024, 1), &[1.0, 2.0, 3.0]);
        let b = ObservationSeries::from_values(month(2024, 3), &[30.0, 40.0]);
        let table = align(
            Category::General,
            vec![("A".to_string(), Ok(a)), ("B".to_string(), Ok(b))],
        );

        let rows = table.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].month, month(2024, 1));
        assert_eq!(rows[0].values, vec![Some(1.0), None]);
        assert_eq!(rows[2].values, vec![Some(3.0), Some(30.0)]);
        assert_eq!(rows[3].values, vec![None, Some(40.0)]);

        // Independent ranges survive.
        assert_eq!(table.series("A").unwrap().last_month(), Some(month(2024, 3)));
        assert_eq!(table.first_month(), Some(month(2024, 1)));
        assert_eq!(table.last_month(), Some(month(2024, 4)));
    }

    #[test]
    fn first_occurrence_of_duplicate_wins() {
        let table = align(
            Category::General,
            vec![
                ("A".to_string(), Ok(ObservationSeries::from_values(month(2024, 1), &[1.0]))),
                ("A".to_string(), Ok(ObservationSeries::from_values(month(2024, 1), &[9.0]))),
            ],
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.series("A").unwrap().values(), vec![1.0]);
    }
}
