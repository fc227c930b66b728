//! Per-crime-type totals for one state.

use std::collections::BTreeMap;

use crime_dash_analytics_models::{ComparisonEntry, ComparisonSeries};
use crime_dash_dataset::CrimeTable;

/// Sums crime counts per crime type for `state`, sorted by crime type
/// name.
#[must_use]
pub fn comparison(table: &CrimeTable, state: &str) -> ComparisonSeries {
    let mut by_type: BTreeMap<&str, f64> = BTreeMap::new();
    for record in table.rows_for_state(state) {
        *by_type.entry(record.crime_type.as_str()).or_default() += record.crime_count;
    }

    ComparisonSeries {
        state: state.to_owned(),
        entries: by_type
            .into_iter()
            .map(|(crime_type, total_count)| ComparisonEntry {
                crime_type: crime_type.to_owned(),
                total_count,
            })
            .collect(),
    }
}
