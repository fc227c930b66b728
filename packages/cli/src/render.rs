//! Plain-text rendering of the dashboard charts.
//!
//! Every function returns an unstyled `String` so output can be tested
//! and piped; the terminal dashboard adds colour when printing headings.

use crime_dash_analytics_models::{
    ComparisonSeries, DashboardOptions, Prediction, Selection, TrendSeries,
};

/// Width of the longest bar in a chart.
pub const BAR_WIDTH: usize = 40;

const BAR_CHAR: char = '█';
const SMOOTHED_CHAR: char = '▒';

/// Returns a bar of `fill` scaled so that `max` spans `width` cells.
///
/// Non-positive values and an empty scale produce an empty bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn bar(value: f64, max: f64, width: usize, fill: char) -> String {
    if value <= 0.0 || max <= 0.0 || !value.is_finite() || !max.is_finite() {
        return String::new();
    }
    let cells = ((value / max).min(1.0) * width as f64).round() as usize;
    std::iter::repeat_n(fill, cells).collect()
}

fn format_count(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Renders the selections block shown above the charts.
#[must_use]
pub fn selection(selection: &Selection) -> String {
    format!(
        "State: {}\nCrime Type: {}\nYear: {}\n",
        selection.state, selection.crime, selection.year
    )
}

/// Renders a model prediction the way the dashboard shows it.
#[must_use]
pub fn prediction(prediction: &Prediction) -> String {
    format!("Predicted Crime Count: {}", prediction.display_count)
}

/// Renders the trend series as a table with actual and smoothed bars.
#[must_use]
pub fn trend(series: &TrendSeries) -> String {
    let mut out = format!("Crime Trend in {} ({})\n", series.state, series.crime);

    if series.is_empty() {
        out.push_str("No records for this selection.\n");
        return out;
    }

    let max = series
        .points
        .iter()
        .map(|p| p.crime_count.max(p.smoothed_count))
        .fold(0.0_f64, f64::max);

    out.push_str(&format!("{:<6} {:>12} {:>12}\n", "Year", "Actual", "Smoothed"));
    for point in &series.points {
        out.push_str(&format!(
            "{:<6} {:>12} {:>12.1}  {}\n",
            point.year,
            format_count(point.crime_count),
            point.smoothed_count,
            bar(point.crime_count, max, BAR_WIDTH, BAR_CHAR)
        ));
        out.push_str(&format!(
            "{:<32}  {}\n",
            "",
            bar(point.smoothed_count, max, BAR_WIDTH, SMOOTHED_CHAR)
        ));
    }
    out.push_str(&format!(
        "{BAR_CHAR} actual  {SMOOTHED_CHAR} trend (3-year average)\n"
    ));

    out
}

/// Renders the comparison series as a horizontal bar chart.
#[must_use]
pub fn comparison(series: &ComparisonSeries) -> String {
    let mut out = format!("Crime Distribution by Type in {}\n", series.state);

    if series.entries.is_empty() {
        out.push_str("No records for this state.\n");
        return out;
    }

    let max = series.largest().map_or(0.0, |e| e.total_count);
    let label_width = series
        .entries
        .iter()
        .map(|e| e.crime_type.chars().count())
        .max()
        .unwrap_or(0);

    for entry in &series.entries {
        out.push_str(&format!(
            "{:<label_width$}  {:>12}  {}\n",
            entry.crime_type,
            format_count(entry.total_count),
            bar(entry.total_count, max, BAR_WIDTH, BAR_CHAR)
        ));
    }
    out.push_str(&format!(
        "{:<label_width$}  {:>12}\n",
        "Total",
        format_count(series.grand_total())
    ));

    out
}

/// Renders the selector choices.
#[must_use]
pub fn options(options: &DashboardOptions) -> String {
    let mut lines = vec![format!("States ({}):", options.states.len())];
    lines.extend(options.states.iter().map(|state| format!("  {state}")));
    lines.push(format!("Crime types ({}):", options.crime_options.len()));
    lines.extend(options.crime_options.iter().map(|crime| format!("  {crime}")));
    lines.push(format!(
        "Years: {}..={} (default {})",
        options.years.min, options.years.max, options.years.default
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use crime_dash_analytics_models::{ComparisonEntry, TrendPoint, YearBounds};
    use crime_dash_crime_models::CrimeSelector;

    use super::*;

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(10.0, 10.0, 4, '#'), "####");
        assert_eq!(bar(5.0, 10.0, 4, '#'), "##");
        assert_eq!(bar(0.0, 10.0, 4, '#'), "");
        assert_eq!(bar(3.0, 0.0, 4, '#'), "");
        assert_eq!(bar(-3.0, 10.0, 4, '#'), "");
    }

    #[test]
    fn prediction_shows_truncated_count() {
        assert_eq!(
            prediction(&Prediction::from_value(140.9)),
            "Predicted Crime Count: 140"
        );
    }

    #[test]
    fn trend_lists_every_year() {
        let series = TrendSeries {
            state: "X".to_owned(),
            crime: CrimeSelector::Combined,
            points: vec![
                TrendPoint {
                    year: 2020,
                    crime_count: 10.0,
                    smoothed_count: 10.0,
                },
                TrendPoint {
                    year: 2021,
                    crime_count: 20.0,
                    smoothed_count: 15.0,
                },
            ],
        };

        let text = trend(&series);
        assert!(text.starts_with("Crime Trend in X (All Crimes (Combined))"));
        assert!(text.contains("2020"));
        assert!(text.contains("2021"));
        assert!(text.contains("15.0"));
        assert!(text.contains(&"█".repeat(BAR_WIDTH)));
    }

    #[test]
    fn empty_trend_says_so() {
        let series = TrendSeries {
            state: "Z".to_owned(),
            crime: CrimeSelector::from("Theft"),
            points: Vec::new(),
        };
        assert!(trend(&series).contains("No records"));
    }

    #[test]
    fn comparison_includes_total() {
        let series = ComparisonSeries {
            state: "X".to_owned(),
            entries: vec![
                ComparisonEntry {
                    crime_type: "Assault".to_owned(),
                    total_count: 10.0,
                },
                ComparisonEntry {
                    crime_type: "Theft".to_owned(),
                    total_count: 30.0,
                },
            ],
        };

        let text = comparison(&series);
        assert!(text.starts_with("Crime Distribution by Type in X"));
        assert!(text.contains("Assault"));
        assert!(text.lines().last().unwrap().contains("40"));
    }

    #[test]
    fn options_show_year_bounds() {
        let text = options(&DashboardOptions {
            states: vec!["X".to_owned()],
            crime_options: vec!["All Crimes (Combined)".to_owned(), "Theft".to_owned()],
            years: YearBounds {
                min: 2001,
                max: 2050,
                default: 2030,
            },
        });
        assert!(text.starts_with("States (1):\n  X\nCrime types (2):\n"));
        assert!(text.ends_with("Years: 2001..=2050 (default 2030)\n"));
    }
}
