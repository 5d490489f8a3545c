//! Monthly normalization of raw daily/weekly/quarterly observations.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Month, ObservationSeries};

/// Maximum number of consecutive empty months bridged with the previous value.
pub const FORWARD_FILL_MONTHS: u32 = 3;

/// Bucket observations into calendar months and bridge short gaps.
///
/// Each month keeps its last valid observation (by date; for equal dates the
/// later entry wins). Up to `FORWARD_FILL_MONTHS` empty months following a
/// valid month repeat that month's value, so quarterly series become monthly.
/// Longer gaps are only partially bridged.
pub fn to_monthly(observations: &[(NaiveDate, f64)]) -> ObservationSeries {
    let mut sorted: Vec<(NaiveDate, f64)> = observations
        .iter()
        .copied()
        .filter(|(_, v)| v.is_finite())
        .collect();
    sorted.sort_by_key(|(d, _)| *d);

    let mut buckets: BTreeMap<Month, f64> = BTreeMap::new();
    for (date, value) in sorted {
        buckets.insert(Month::from_date(date), value);
    }

    forward_fill(&buckets, FORWARD_FILL_MONTHS)
}

fn forward_fill(buckets: &BTreeMap<Month, f64>, limit: u32) -> ObservationSeries {
    let mut out = Vec::with_capacity(buckets.len());
    let mut prev: Option<(Month, f64)> = None;

    for (&month, &value) in buckets {
        if let Some((last_month, last_value)) = prev {
            let mut fill = last_month.succ();
            let mut filled = 0;
            while fill < month && filled < limit {
                out.push((fill, last_value));
                fill = fill.succ();
                filled += 1;
            }
        }
        out.push((month, value));
        prev = Some((month, value));
    }

    ObservationSeries::from_points(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    #[test]
    fn keeps_last_observation_per_month() {
        let obs = vec![
            (d(2024, 1, 5), 1.0),
            (d(2024, 1, 26), 3.0),
            (d(2024, 1, 12), 2.0),
            (d(2024, 2, 2), 4.0),
        ];
        let series = to_monthly(&obs);
        assert_eq!(series.points(), &[(month(2024, 1), 3.0), (month(2024, 2), 4.0)]);
    }

    #[test]
    fn quarterly_series_becomes_monthly() {
        let obs = vec![(d(2023, 1, 1), 10.0), (d(2023, 4, 1), 11.0), (d(2023, 7, 1), 12.0)];
        let series = to_monthly(&obs);
        assert_eq!(
            series.values(),
            vec![10.0, 10.0, 10.0, 11.0, 11.0, 11.0, 12.0]
        );
        assert_eq!(series.first_month(), Some(month(2023, 1)));
        assert_eq!(series.last_month(), Some(month(2023, 7)));
    }

    #[test]
    fn long_gaps_are_only_partially_bridged() {
        let obs = vec![(d(2020, 1, 1), 5.0), (d(2020, 8, 1), 6.0)];
        let series = to_monthly(&obs);
        // Jan value, three filled months, then nothing until August.
        assert_eq!(series.len(), 5);
        assert_eq!(series.get(month(2020, 4)), Some(5.0));
        assert_eq!(series.get(month(2020, 5)), None);
        assert_eq!(series.get(month(2020, 8)), Some(6.0));
    }

    #[test]
    fn months_are_strictly_increasing_and_finite() {
        let obs = vec![
            (d(2021, 12, 31), 1.0),
            (d(2021, 12, 30), f64::INFINITY),
            (d(2022, 3, 1), 2.0),
            (d(2021, 11, 1), 0.5),
            (d(2022, 3, 1), 2.5),
        ];
        let series = to_monthly(&obs);
        for pair in series.points().windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        assert!(series.values().iter().all(|v| v.is_finite()));
        assert_eq!(series.get(month(2022, 3)), Some(2.5));
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(to_monthly(&[]).is_empty());
    }
}
