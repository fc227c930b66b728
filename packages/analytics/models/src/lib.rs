#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trend, comparison, prediction, and dashboard request types.
//!
//! These are the values the analytics crate produces for a front end to
//! render. They carry no behaviour beyond small accessors.

use crime_dash_crime_models::CrimeSelector;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One year of a crime trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Calendar year.
    pub year: i32,
    /// Total crimes recorded in the year.
    pub crime_count: f64,
    /// Trailing three-year average of `crime_count`.
    pub smoothed_count: f64,
}

/// Year-by-year totals for one state and crime selection.
///
/// Points are strictly increasing by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    /// State the series was computed for.
    pub state: String,
    /// Crime selection the series was computed for.
    pub crime: CrimeSelector,
    /// Ordered yearly points.
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    /// Returns the years covered, in order.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    /// Returns `true` if no rows matched the selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Total crimes of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonEntry {
    /// Crime type name.
    pub crime_type: String,
    /// Crimes of this type summed over every year.
    pub total_count: f64,
}

/// Per-crime-type totals for one state, sorted by crime type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSeries {
    /// State the breakdown was computed for.
    pub state: String,
    /// One entry per crime type observed for the state.
    pub entries: Vec<ComparisonEntry>,
}

impl ComparisonSeries {
    /// Sums every entry.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.entries.iter().map(|e| e.total_count).sum()
    }

    /// Returns the entry with the largest total, if any.
    #[must_use]
    pub fn largest(&self) -> Option<&ComparisonEntry> {
        self.entries
            .iter()
            .max_by(|a, b| a.total_count.total_cmp(&b.total_count))
    }
}

/// A model prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Raw model output.
    pub value: f64,
    /// Model output truncated toward zero, as displayed.
    pub display_count: i64,
}

impl Prediction {
    /// Wraps a raw model output.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            display_count: value.trunc() as i64,
        }
    }
}

/// What a dashboard interaction asks for.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DashboardAction {
    /// Recompute the charts only.
    #[default]
    Refresh,
    /// Recompute the charts and run the model.
    Predict,
}

/// User-facing category of a failed dashboard interaction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The crime dataset is missing or malformed.
    DataUnavailable,
    /// The model artifact is missing or corrupt.
    ModelUnavailable,
    /// A feature vector does not fit the model's schema.
    SchemaMismatch,
}

/// The user's current selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Selected state.
    pub state: String,
    /// Selected crime type or the combined option.
    pub crime: CrimeSelector,
    /// Selected year.
    pub year: i32,
}

/// One dashboard interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRequest {
    /// Current selections.
    pub selection: Selection,
    /// Requested action.
    #[serde(default)]
    pub action: DashboardAction,
}

/// Everything a front end renders after one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Echo of the selections the response was computed for.
    pub selection: Selection,
    /// Model output, present only for [`DashboardAction::Predict`].
    pub prediction: Option<Prediction>,
    /// Trend chart data.
    pub trend: TrendSeries,
    /// Comparison chart data.
    pub comparison: ComparisonSeries,
}

/// Bounds of the year selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBounds {
    /// Earliest selectable year.
    pub min: i32,
    /// Latest selectable year.
    pub max: i32,
    /// Preselected year.
    pub default: i32,
}

impl YearBounds {
    /// Returns `true` if `year` is selectable.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// Choices offered by the dashboard selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOptions {
    /// Distinct states, sorted.
    pub states: Vec<String>,
    /// The combined option followed by distinct crime types, sorted.
    pub crime_options: Vec<String>,
    /// Year selector bounds.
    pub years: YearBounds,
}
