//! Shared domain types.
//!
//! These types are intentionally small and value-like so they can be:
//!
//! - built once from the catalog and looked up without copying
//! - passed through the fetch -> align -> analyze pipeline unchanged
//! - rendered by the CLI report and the TUI alike

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::Deserialize;

/// Calendar month key (`YYYY-MM`).
///
/// Field order matters: the derived `Ord` sorts by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Months since year 0 (`year * 12 + month - 1`); used as a chart x-axis.
    pub fn ordinal(self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }

    pub fn from_ordinal(ordinal: i32) -> Self {
        Self {
            year: ordinal.div_euclid(12),
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Indicator category (one dashboard tab each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Category {
    Employment,
    Revenues,
    Inflation,
    General,
}

impl Category {
    /// Display order.
    pub const ALL: [Category; 4] = [
        Category::Employment,
        Category::Revenues,
        Category::Inflation,
        Category::General,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Employment => "Employment",
            Category::Revenues => "Revenues",
            Category::Inflation => "Inflation",
            Category::General => "General",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Base name for exported files (`employment_data.csv`).
    pub fn file_stem(self) -> String {
        format!("{}_data", self.display_name().to_lowercase())
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether a rising indicator is good (`Direct`) or bad (`Inverse`) news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Correlation {
    #[default]
    #[serde(alias = "direct")]
    Direct,
    #[serde(alias = "inverse")]
    Inverse,
}

impl Correlation {
    /// Sign a raw change so that positive always means favorable.
    pub fn apply(self, change: f64) -> f64 {
        match self {
            Correlation::Direct => change,
            Correlation::Inverse => -change,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Correlation::Direct => "Direct",
            Correlation::Inverse => "Inverse",
        }
    }
}

/// How the API should express a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum UnitMode {
    /// Raw level (FRED `units=lin`).
    #[default]
    Level,
    /// Year-over-year percent change (FRED `units=pc1`).
    YearOverYear,
}

impl UnitMode {
    /// Strict parse; `None` for unrecognized names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "level" | "lin" => Some(UnitMode::Level),
            "yoy" | "pc1" | "year-over-year-percent-change" => Some(UnitMode::YearOverYear),
            _ => None,
        }
    }

    /// Value of the FRED `units` request parameter.
    pub fn fred_units(self) -> &'static str {
        match self {
            UnitMode::Level => "lin",
            UnitMode::YearOverYear => "pc1",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitMode::Level => "level",
            UnitMode::YearOverYear => "year-over-year-percent-change",
        }
    }
}

impl From<String> for UnitMode {
    /// Unrecognized names fall back to `Level`.
    fn from(raw: String) -> Self {
        UnitMode::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(unit_mode = %raw, "unknown unit mode, using level");
            UnitMode::Level
        })
    }
}

/// Static metadata for one tracked indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDescriptor {
    /// FRED series id.
    pub id: String,
    pub name: String,
    pub category: Category,
    pub correlation: Correlation,
    pub unit_mode: UnitMode,
    /// Raw values are already percentages (rates), so level changes are
    /// reported in percentage points rather than relative percent.
    pub is_percent: bool,
}

/// One value per calendar month, strictly increasing, finite values only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationSeries {
    points: Vec<(Month, f64)>,
}

impl ObservationSeries {
    /// Build from points in any order.
    ///
    /// Non-finite values are dropped; when a month repeats, the later point wins.
    pub fn from_points(points: impl IntoIterator<Item = (Month, f64)>) -> Self {
        let mut by_month = BTreeMap::new();
        for (month, value) in points {
            if value.is_finite() {
                by_month.insert(month, value);
            }
        }
        Self {
            points: by_month.into_iter().collect(),
        }
    }

    /// Consecutive months starting at `start`.
    pub fn from_values(start: Month, values: &[f64]) -> Self {
        let mut month = start;
        let mut points = Vec::with_capacity(values.len());
        for &value in values {
            points.push((month, value));
            month = month.succ();
        }
        Self::from_points(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(Month, f64)] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn first_month(&self) -> Option<Month> {
        self.points.first().map(|(m, _)| *m)
    }

    pub fn last_month(&self) -> Option<Month> {
        self.points.last().map(|(m, _)| *m)
    }

    pub fn latest(&self) -> Option<(Month, f64)> {
        self.points.last().copied()
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.points
            .binary_search_by_key(&month, |(m, _)| *m)
            .ok()
            .map(|idx| self.points[idx].1)
    }

    /// Points with `month >= from`.
    pub fn since(&self, from: Month) -> &[(Month, f64)] {
        let start = self.points.partition_point(|(m, _)| *m < from);
        &self.points[start..]
    }

    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().map(|(_, v)| v).sum::<f64>() / self.points.len() as f64)
    }
}
