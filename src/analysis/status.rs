//! Latest change and short-term trend status per series.

use crate::data::CategoryTable;
use crate::domain::{Catalog, Month, ObservationSeries, SeriesDescriptor, UnitMode};

/// Observations needed to classify a status (three period-over-period changes).
pub const MIN_STATUS_OBSERVATIONS: usize = 4;

/// Trend classification from the last three signed changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    AllClear,
    WatchCloselyImproving,
    WatchCloselyNeutral,
    PotentialDanger,
    Danger,
    InsufficientData,
}

impl StatusKind {
    /// Most to least favorable, then missing data.
    pub const ALL: [StatusKind; 6] = [
        StatusKind::AllClear,
        StatusKind::WatchCloselyImproving,
        StatusKind::WatchCloselyNeutral,
        StatusKind::PotentialDanger,
        StatusKind::Danger,
        StatusKind::InsufficientData,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusKind::AllClear => "All clear",
            StatusKind::WatchCloselyImproving => "Keep an eye (improving)",
            StatusKind::WatchCloselyNeutral => "Keep an eye",
            StatusKind::PotentialDanger => "Potential danger",
            StatusKind::Danger => "Danger",
            StatusKind::InsufficientData => "Insufficient data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStatus {
    pub kind: StatusKind,
    /// Signed latest change (positive = favorable).
    pub latest_change: f64,
}

/// Everything a status card shows for one series.
#[derive(Debug, Clone)]
pub struct StatusCard<'a> {
    pub descriptor: &'a SeriesDescriptor,
    pub latest: Option<(Month, f64)>,
    pub status: DerivedStatus,
}

/// Signed latest change for `series` under `descriptor`'s conventions.
///
/// - year-over-year series: the latest value itself
/// - percent levels: difference of the two latest values (percentage points)
/// - other levels: relative change of the two latest values, in percent
///
/// Returns `0.0` when there are not enough observations.
pub fn latest_change(series: &ObservationSeries, descriptor: &SeriesDescriptor) -> f64 {
    let values = series.values();
    let needed = match descriptor.unit_mode {
        UnitMode::YearOverYear => 1,
        UnitMode::Level => 2,
    };
    if values.len() < needed {
        return 0.0;
    }
    signed_changes(&values[values.len() - needed..], descriptor)
        .last()
        .copied()
        .unwrap_or(0.0)
}

/// Classify the recent trend of `series`.
pub fn status(series: &ObservationSeries, descriptor: &SeriesDescriptor) -> DerivedStatus {
    let latest_change = latest_change(series, descriptor);
    let values = series.values();
    if values.len() < MIN_STATUS_OBSERVATIONS {
        return DerivedStatus {
            kind: StatusKind::InsufficientData,
            latest_change,
        };
    }

    let changes = signed_changes(&values[values.len() - MIN_STATUS_OBSERVATIONS..], descriptor);
    let last_three = &changes[changes.len() - 3..];
    DerivedStatus {
        kind: classify([last_three[0], last_three[1], last_three[2]]),
        latest_change,
    }
}

/// Status cards for every series of a table that has a descriptor.
pub fn status_cards<'a>(table: &CategoryTable, catalog: &'a Catalog) -> Vec<StatusCard<'a>> {
    table
        .columns()
        .iter()
        .filter_map(|(id, series)| {
            let descriptor = catalog.lookup(table.category(), id)?;
            Some(StatusCard {
                descriptor,
                latest: series.latest(),
                status: status(series, descriptor),
            })
        })
        .collect()
}

/// `changes` is oldest first.
fn classify(changes: [f64; 3]) -> StatusKind {
    let positive = changes.iter().filter(|c| **c > 0.0).count();
    let latest = changes[2];
    match positive {
        3 => StatusKind::AllClear,
        2 if latest > 0.0 => StatusKind::WatchCloselyImproving,
        1 if latest < 0.0 => StatusKind::PotentialDanger,
        0 => StatusKind::Danger,
        _ => StatusKind::WatchCloselyNeutral,
    }
}

/// Period-over-period changes with polarity applied.
///
/// Year-over-year values are already rates and pass through one per value;
/// level series yield one change per consecutive pair.
fn signed_changes(values: &[f64], descriptor: &SeriesDescriptor) -> Vec<f64> {
    let raw: Vec<f64> = match descriptor.unit_mode {
        UnitMode::YearOverYear => values.to_vec(),
        UnitMode::Level if descriptor.is_percent => values.windows(2).map(|w| w[1] - w[0]).collect(),
        UnitMode::Level => values.windows(2).map(|w| relative_change(w[0], w[1])).collect(),
    };
    raw.into_iter().map(|c| descriptor.correlation.apply(c)).collect()
}

fn relative_change(prev: f64, last: f64) -> f64 {
    if prev == 0.0 {
        return 0.0;
    }
    (last / prev - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Correlation};

    fn descriptor(correlation: Correlation, unit_mode: UnitMode, is_percent: bool) -> SeriesDescriptor {
        SeriesDescriptor {
            id: "TEST".to_string(),
            name: "Test".to_string(),
            category: Category::General,
            correlation,
            unit_mode,
            is_percent,
        }
    }

    fn series(values: &[f64]) -> ObservationSeries {
        ObservationSeries::from_values(Month::new(2024, 1).unwrap(), values)
    }

    #[test]
    fn falling_level_is_danger() {
        let d = descriptor(Correlation::Direct, UnitMode::Level, false);
        let s = series(&[100.0, 102.0, 99.0, 95.0]);

        let changes = signed_changes(&s.values(), &d);
        assert!((changes[0] - 2.0).abs() < 1e-9);
        assert!((changes[1] + 2.941_176).abs() < 1e-4);
        assert!((changes[2] + 4.040_404).abs() < 1e-4);

        let st = status(&s, &d);
        assert_eq!(st.kind, StatusKind::Danger);
        assert!((st.latest_change + 4.040_404).abs() < 1e-4);
    }

    #[test]
    fn inverse_polarity_flips_signs() {
        let d = descriptor(Correlation::Inverse, UnitMode::Level, false);
        let s = series(&[100.0, 102.0, 99.0, 95.0]);
        let st = status(&s, &d);
        assert_eq!(st.kind, StatusKind::WatchCloselyImproving);
        assert!((st.latest_change - 4.040_404).abs() < 1e-4);
        // Stored values are untouched.
        assert_eq!(s.values(), vec![100.0, 102.0, 99.0, 95.0]);
    }

    #[test]
    fn year_over_year_values_are_not_differenced() {
        let d = descriptor(Correlation::Direct, UnitMode::YearOverYear, true);
        let s = series(&[1.5, 1.2, 1.1, 0.9]);
        let st = status(&s, &d);
        assert_eq!(st.kind, StatusKind::AllClear);
        assert!((st.latest_change - 0.9).abs() < 1e-12);
    }

    #[test]
    fn percent_levels_use_point_differences() {
        let d = descriptor(Correlation::Inverse, UnitMode::Level, true);
        let s = series(&[4.0, 4.2, 4.1, 3.8]);
        // Raw diffs: +0.2, -0.1, -0.3; inverted: -0.2, +0.1, +0.3.
        let st = status(&s, &d);
        assert_eq!(st.kind, StatusKind::WatchCloselyImproving);
        assert!((st.latest_change - 0.3).abs() < 1e-9);
    }

    #[test]
    fn short_series_is_insufficient_for_every_mode() {
        for d in [
            descriptor(Correlation::Direct, UnitMode::Level, false),
            descriptor(Correlation::Inverse, UnitMode::Level, true),
            descriptor(Correlation::Direct, UnitMode::YearOverYear, true),
        ] {
            for n in 0..MIN_STATUS_OBSERVATIONS {
                let values: Vec<f64> = (0..n).map(|i| 10.0 + i as f64).collect();
                assert_eq!(status(&series(&values), &d).kind, StatusKind::InsufficientData);
            }
        }
    }

    #[test]
    fn degenerate_latest_change_is_zero() {
        let level = descriptor(Correlation::Direct, UnitMode::Level, false);
        assert_eq!(latest_change(&series(&[5.0]), &level), 0.0);
        assert_eq!(latest_change(&series(&[0.0, 5.0]), &level), 0.0);

        let yoy = descriptor(Correlation::Direct, UnitMode::YearOverYear, true);
        assert_eq!(latest_change(&series(&[]), &yoy), 0.0);
        assert_eq!(latest_change(&series(&[2.5]), &yoy), 2.5);
    }

    #[test]
    fn classification_table() {
        assert_eq!(classify([1.0, 1.0, 1.0]), StatusKind::AllClear);
        assert_eq!(classify([-1.0, 1.0, 1.0]), StatusKind::WatchCloselyImproving);
        assert_eq!(classify([1.0, 1.0, -1.0]), StatusKind::WatchCloselyNeutral);
        assert_eq!(classify([1.0, -1.0, -1.0]), StatusKind::PotentialDanger);
        assert_eq!(classify([-1.0, -1.0, 1.0]), StatusKind::WatchCloselyNeutral);
        assert_eq!(classify([1.0, -1.0, 0.0]), StatusKind::WatchCloselyNeutral);
        assert_eq!(classify([-1.0, 0.0, -1.0]), StatusKind::Danger);
    }

    #[test]
    fn cards_follow_table_columns() {
        let catalog = crate::domain::Catalog::builtin();
        let table = crate::data::align(
            Category::General,
            vec![
                ("UNRATE".to_string(), Ok(series(&[4.0, 4.1, 4.2, 4.3]))),
                ("NOT_IN_CATALOG".to_string(), Ok(series(&[1.0, 2.0]))),
            ],
        );
        let cards = status_cards(&table, &catalog);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].descriptor.id, "UNRATE");
        // Rising unemployment is unfavorable every month.
        assert_eq!(cards[0].status.kind, StatusKind::Danger);
        assert_eq!(cards[0].latest.map(|(_, v)| v), Some(4.3));
    }
}
