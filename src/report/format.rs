//! Formatted terminal output: overview, status dashboard, summaries, correlation.
//!
//! We keep formatting code in one place so:
//! - the pipeline/analysis code stays clean and testable
//! - output changes are localized

use crate::analysis::{
    scale_groups, status_cards, summarize, CorrelationMatrix, StatusCard, StatusKind,
};
use crate::app::pipeline::Dataset;
use crate::data::CategoryTable;
use crate::domain::{Catalog, SeriesDescriptor, UnitMode};

/// Per-category load summary plus failures.
pub fn format_overview(dataset: &Dataset) -> String {
    let mut out = String::new();

    out.push_str("=== pulse - indicator reload ===\n");
    out.push_str(&format!("As-of: {}\n", dataset.as_of));
    out.push_str(&format!(
        "Loaded: {} series | failed: {}\n\n",
        dataset.series_count(),
        dataset.failures.len()
    ));

    out.push_str("Data overview:\n");
    for table in &dataset.tables {
        if table.is_empty() {
            out.push_str(&format!("- {}: no data for category\n", table.category()));
            continue;
        }
        let range = match (table.first_month(), table.last_month()) {
            (Some(first), Some(last)) => format!(" [{first} .. {last}]"),
            _ => String::new(),
        };
        out.push_str(&format!(
            "- {}: {} metrics, {} observations{range}\n",
            table.category(),
            table.len(),
            table.months().len(),
        ));
    }

    if !dataset.failures.is_empty() {
        out.push_str("\nUnavailable series:\n");
        for f in &dataset.failures {
            out.push_str(&format!("- [{}] {}: {}\n", f.category, f.identifier, f.error));
        }
    }

    out
}

/// Status cards for every non-empty category.
pub fn format_dashboard(dataset: &Dataset, catalog: &Catalog) -> String {
    let mut out = String::new();
    for table in dataset.tables.iter().filter(|t| !t.is_empty()) {
        out.push_str(&format!("\n{}\n", table.category()));
        out.push_str(&format_cards(&status_cards(table, catalog)));
    }
    out
}

fn format_cards(cards: &[StatusCard<'_>]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<36} {:>14} {:>8} {:>10} {:<24}\n",
            "indicator", "latest", "month", "change", "status"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<36} {:-<14} {:-<8} {:-<10} {:-<24}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for card in cards {
        let (month, value) = card
            .latest
            .map(|(m, v)| (m.to_string(), fmt_value(v)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        out.push_str(
            format!(
                "{:<36} {:>14} {:>8} {:>10} {:<24}\n",
                truncate(&card.descriptor.name, 36),
                value,
                month,
                fmt_change(card.status.latest_change, card.descriptor),
                card.status.kind.label(),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Summary statistics and scale groups for one category.
pub fn format_category_summary(table: &CategoryTable, catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} metrics ===\n", table.category()));

    if table.is_empty() {
        out.push_str("No data for category.\n");
        return out;
    }

    out.push_str(
        format!(
            "{:<20} {:<32} {:>6} {:>14} {:>12} {:>14} {:>14}\n",
            "id", "name", "n", "mean", "std", "min", "max"
        )
        .trim_end(),
    );
    out.push('\n');

    for (id, series) in table.columns() {
        let Some(stats) = summarize(series) else {
            continue;
        };
        out.push_str(
            format!(
                "{:<20} {:<32} {:>6} {:>14.2} {:>12} {:>14.2} {:>14.2}\n",
                truncate(id, 20),
                truncate(catalog.display_name(table.category(), id), 32),
                stats.count,
                stats.mean,
                stats.std_dev.map(|s| format!("{s:.2}")).unwrap_or_else(|| "-".to_string()),
                stats.min,
                stats.max,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str("\nScale groups:\n");
    for (magnitude, ids) in scale_groups(table) {
        out.push_str(&format!("- 10^{magnitude}: {}\n", ids.join(", ")));
    }

    out
}

/// Every aligned row of a table; blank cells where a series has no value.
pub fn format_raw_table(table: &CategoryTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} raw data ===\n", table.category()));
    if table.is_empty() {
        out.push_str("No data for category.\n");
        return out;
    }

    let mut header = format!("{:<8}", "month");
    for id in table.identifiers() {
        header.push_str(&format!(" {:>14}", truncate(id, 14)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for row in table.rows() {
        let mut line = format!("{:<8}", row.month.to_string());
        for value in &row.values {
            let cell = value.map(fmt_value).unwrap_or_default();
            line.push_str(&format!(" {cell:>14}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// What each status label means, most favorable first.
pub fn format_status_legend() -> String {
    let mut out = String::new();
    out.push_str("Status legend (last three changes, favorable = positive):\n");
    for kind in StatusKind::ALL {
        out.push_str(&format!("- {:<24} {}\n", kind.label(), status_rule(kind)));
    }
    out
}

pub fn status_rule(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::AllClear => "all three favorable",
        StatusKind::WatchCloselyImproving => "two favorable, latest favorable",
        StatusKind::WatchCloselyNeutral => "mixed",
        StatusKind::PotentialDanger => "one favorable, latest unfavorable",
        StatusKind::Danger => "none favorable",
        StatusKind::InsufficientData => "fewer than four observations",
    }
}

/// Lower-triangle correlation table labelled by identifier.
pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    out.push_str("=== Cross-category correlation ===\n");
    if matrix.is_empty() {
        out.push_str("No data loaded.\n");
        return out;
    }

    let ids = matrix.identifiers();
    let mut header = format!("{:<14}", "");
    for id in ids {
        header.push_str(&format!(" {:>8}", truncate(id, 8)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (row, id) in ids.iter().enumerate() {
        let mut line = format!("{:<14}", truncate(id, 14));
        for col in 0..=row {
            let cell = matrix
                .get(row, col)
                .map(|r| format!("{r:.2}"))
                .unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {cell:>8}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Configured descriptors grouped by category.
pub fn format_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for category in crate::domain::Category::ALL {
        let descriptors: Vec<&SeriesDescriptor> = catalog.in_category(category).collect();
        if descriptors.is_empty() {
            continue;
        }
        out.push_str(&format!("{category}\n"));
        for d in descriptors {
            out.push_str(
                format!(
                    "  {:<20} {:<40} {:<8} {:<6} {}\n",
                    d.id,
                    truncate(&d.name, 40),
                    d.correlation.label(),
                    if d.unit_mode == UnitMode::YearOverYear { "yoy" } else { "level" },
                    if d.is_percent { "%" } else { "" },
                )
                .trim_end(),
            );
            out.push('\n');
        }
    }
    out
}

/// Change with its unit: percentage points for percent levels, percent otherwise.
pub fn fmt_change(change: f64, descriptor: &SeriesDescriptor) -> String {
    match descriptor.unit_mode {
        UnitMode::Level if descriptor.is_percent => format!("{change:+.2}pp"),
        _ => format!("{change:+.2}%"),
    }
}

pub fn fmt_value(v: f64) -> String {
    if v.abs() >= 1_000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::analysis::correlation_matrix;
    use crate::app::pipeline::SeriesFailure;
    use crate::data::align;
    use crate::domain::{Category, Month, ObservationSeries};
    use crate::error::FetchError;

    fn dataset() -> Dataset {
        let start = Month::new(2024, 1).unwrap();
        let general = align(
            Category::General,
            vec![
                ("UNRATE".to_string(), Ok(ObservationSeries::from_values(start, &[4.0, 4.1, 4.2, 4.3]))),
                ("GDP".to_string(), Ok(ObservationSeries::from_values(start, &[28_000.0, 28_400.0]))),
            ],
        );
        Dataset {
            as_of: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
            tables: vec![CategoryTable::empty(Category::Employment), general],
            failures: vec![SeriesFailure {
                category: Category::General,
                identifier: "PCE".to_string(),
                error: FetchError::Status {
                    series_id: "PCE".to_string(),
                    status: 500,
                },
            }],
        }
    }

    #[test]
    fn overview_lists_counts_and_failures() {
        let text = format_overview(&dataset());
        assert!(text.contains("Employment: no data for category"));
        assert!(text.contains("General: 2 metrics, 4 observations [2024-01 .. 2024-04]"));
        assert!(text.contains("PCE: request for PCE returned status 500"));
    }

    #[test]
    fn dashboard_shows_status_and_change_units() {
        let catalog = Catalog::builtin();
        let text = format_dashboard(&dataset(), &catalog);
        assert!(text.contains("Unemployment Rate"));
        assert!(text.contains("-0.10pp"));
        assert!(text.contains("Danger"));
        // Two observations are not enough for a status.
        assert!(text.contains("+1.43%"));
        assert!(text.contains("Insufficient data"));
        assert!(!text.contains("Employment"));
    }

    #[test]
    fn summary_includes_scale_groups() {
        let catalog = Catalog::builtin();
        let ds = dataset();
        let text = format_category_summary(ds.table(Category::General).unwrap(), &catalog);
        assert!(text.contains("Gross Domestic Product"));
        assert!(text.contains("- 10^0: UNRATE"));
        assert!(text.contains("- 10^4: GDP"));

        let empty = format_category_summary(ds.table(Category::Employment).unwrap(), &catalog);
        assert!(empty.contains("No data for category."));
    }

    #[test]
    fn correlation_table_is_lower_triangular() {
        let ds = dataset();
        let text = format_correlation(&correlation_matrix(&ds.tables));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("UNRATE"));
        assert!(lines[2].ends_with("1.00"));
        assert!(lines[3].ends_with("1.00"));
    }

    #[test]
    fn raw_table_lists_union_of_months() {
        let ds = dataset();
        let text = format_raw_table(ds.table(Category::General).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("month"));
        assert!(lines[1].contains("UNRATE") && lines[1].contains("GDP"));
        assert!(lines[2].starts_with("2024-01"));
        assert!(lines[2].ends_with("28000"));
        // GDP stops in February; the row keeps UNRATE only.
        assert!(lines[5].starts_with("2024-04"));
        assert!(lines[5].ends_with("4.30"));

        let empty = format_raw_table(ds.table(Category::Employment).unwrap());
        assert!(empty.contains("No data for category."));
    }

    #[test]
    fn legend_covers_every_status() {
        let text = format_status_legend();
        for kind in StatusKind::ALL {
            assert!(text.contains(kind.label()));
        }
        assert!(text.contains("fewer than four observations"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
