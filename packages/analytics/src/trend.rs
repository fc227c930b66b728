//! Year-by-year crime totals with a trailing moving average.

use std::collections::BTreeMap;

use crime_dash_analytics_models::{TrendPoint, TrendSeries};
use crime_dash_crime_models::CrimeSelector;
use crime_dash_dataset::CrimeTable;

/// Number of points in the trailing average window.
pub const SMOOTHING_WINDOW: usize = 3;

/// Totals crimes per year for `state` and `crime`, sorted by year, with a
/// trailing [`SMOOTHING_WINDOW`]-point average.
#[must_use]
pub fn trend(table: &CrimeTable, state: &str, crime: &CrimeSelector) -> TrendSeries {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for record in table
        .rows_for_state(state)
        .filter(|r| crime.matches(&r.crime_type))
    {
        *by_year.entry(record.year).or_default() += record.crime_count;
    }

    let (years, counts): (Vec<i32>, Vec<f64>) = by_year.into_iter().unzip();
    let smoothed = trailing_mean(&counts, SMOOTHING_WINDOW);

    let points = years
        .into_iter()
        .zip(counts)
        .zip(smoothed)
        .map(|((year, crime_count), smoothed_count)| TrendPoint {
            year,
            crime_count,
            smoothed_count,
        })
        .collect();

    TrendSeries {
        state: state.to_owned(),
        crime: crime.clone(),
        points,
    }
}

/// Averages each value with up to `window - 1` preceding values.
///
/// The first points use a shrinking window, so the output has the same
/// length as the input and no undefined leading entries.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}
