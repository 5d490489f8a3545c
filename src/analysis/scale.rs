//! Order-of-magnitude grouping of series, for putting comparable series on one chart.
//!
//! Series whose mean sits near a power of ten can move between groups from one
//! reload to the next as new observations shift the mean.

use std::collections::BTreeMap;

use crate::data::CategoryTable;

/// `floor(log10(|mean|))`, with a zero mean treated as magnitude 0.
pub fn magnitude(mean: f64) -> i32 {
    if mean == 0.0 {
        return 0;
    }
    mean.abs().log10().floor() as i32
}

/// Group identifiers by magnitude; input order is kept inside each group.
///
/// Non-finite means are skipped.
pub fn group_by_magnitude<'a, I>(means: I) -> BTreeMap<i32, Vec<String>>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut groups: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    for (id, mean) in means {
        if !mean.is_finite() {
            continue;
        }
        groups.entry(magnitude(mean)).or_default().push(id.to_string());
    }
    groups
}

/// Scale groups for every series in a table.
pub fn scale_groups(table: &CategoryTable) -> BTreeMap<i32, Vec<String>> {
    group_by_magnitude(
        table
            .columns()
            .iter()
            .filter_map(|(id, series)| series.mean().map(|m| (id.as_str(), m))),
    )
}
