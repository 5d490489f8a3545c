//! Summary statistics and cross-series correlation.

use nalgebra::DMatrix;

use crate::data::CategoryTable;
use crate::domain::ObservationSeries;

/// Per-series summary used by the data view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); `None` below two observations.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

pub fn summarize(series: &ObservationSeries) -> Option<SummaryStats> {
    let values = series.values();
    let n = values.len();
    let mean = series.mean()?;

    let std_dev = if n >= 2 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
        Some(variance.sqrt())
    } else {
        None
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(SummaryStats {
        count: n,
        mean,
        std_dev,
        min,
        max,
    })
}

/// Pearson correlation over the months both series share.
///
/// `None` with fewer than two shared months or when either side is constant.
pub fn pearson(a: &ObservationSeries, b: &ObservationSeries) -> Option<f64> {
    let (x, y) = shared_values(a, b);
    let n = x.len();
    if n < 2 {
        return None;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut numer = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        numer += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    if denom_x == 0.0 || denom_y == 0.0 {
        return None;
    }

    // Clamp rounding noise.
    Some((numer / (denom_x.sqrt() * denom_y.sqrt())).clamp(-1.0, 1.0))
}

/// Merge-join on month; both series are sorted.
fn shared_values(a: &ObservationSeries, b: &ObservationSeries) -> (Vec<f64>, Vec<f64>) {
    let (pa, pb) = (a.points(), b.points());
    let (mut i, mut j) = (0, 0);
    let mut x = Vec::new();
    let mut y = Vec::new();
    while i < pa.len() && j < pb.len() {
        match pa[i].0.cmp(&pb[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                x.push(pa[i].1);
                y.push(pb[j].1);
                i += 1;
                j += 1;
            }
        }
    }
    (x, y)
}

/// Symmetric correlation matrix over identifiers from one or more tables.
///
/// Undefined entries are stored as NaN and surfaced as `None` by `get`.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    identifiers: Vec<String>,
    values: DMatrix<f64>,
}

impl CorrelationMatrix {
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.len() || col >= self.len() {
            return None;
        }
        let v = self.values[(row, col)];
        v.is_finite().then_some(v)
    }

    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let row = self.identifiers.iter().position(|id| id == a)?;
        let col = self.identifiers.iter().position(|id| id == b)?;
        self.get(row, col)
    }
}

/// Correlate every series across `tables` (pairwise-complete months).
///
/// An identifier appearing in several tables is taken from the first one.
pub fn correlation_matrix<'a, I>(tables: I) -> CorrelationMatrix
where
    I: IntoIterator<Item = &'a CategoryTable>,
{
    let mut columns: Vec<(&str, &ObservationSeries)> = Vec::new();
    for table in tables {
        for (id, series) in table.columns() {
            if !columns.iter().any(|(seen, _)| *seen == id.as_str()) {
                columns.push((id.as_str(), series));
            }
        }
    }

    let n = columns.len();
    let mut values = DMatrix::from_element(n, n, f64::NAN);
    for i in 0..n {
        for j in i..n {
            if let Some(r) = pearson(columns[i].1, columns[j].1) {
                values[(i, j)] = r;
                values[(j, i)] = r;
            }
        }
    }

    CorrelationMatrix {
        identifiers: columns.iter().map(|(id, _)| id.to_string()).collect(),
        values,
    }
}
