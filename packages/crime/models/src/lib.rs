#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime record, crime selector, and model feature schema types.
//!
//! This crate defines the vocabulary shared by every other crime-dash
//! crate: the rows of the processed dataset ([`CrimeRecord`]), the user's
//! crime-type choice ([`CrimeSelector`]), and the one-hot feature layout a
//! trained regression model expects ([`FeatureSchema`] and
//! [`FeatureVector`]).

pub mod features;

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use features::{FeatureSchema, FeatureVector, IndicatorFamily, SchemaError, YEAR_FEATURE};

/// Label of the crime selector option that aggregates every crime type.
pub const COMBINED_CRIMES_LABEL: &str = "All Crimes (Combined)";

/// One row of the processed crime dataset.
///
/// Field names follow the column headers of the cleaned CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeRecord {
    /// State or region name.
    #[serde(rename = "State")]
    pub state: String,
    /// Crime category name.
    #[serde(rename = "Crime_Type")]
    pub crime_type: String,
    /// Calendar year the count was recorded for.
    #[serde(rename = "Year")]
    pub year: i32,
    /// Number of recorded crimes.
    #[serde(rename = "Crime_Count")]
    pub crime_count: f64,
}

impl CrimeRecord {
    /// Creates a record from its four column values.
    #[must_use]
    pub fn new(state: &str, crime_type: &str, year: i32, crime_count: f64) -> Self {
        Self {
            state: state.to_owned(),
            crime_type: crime_type.to_owned(),
            year,
            crime_count,
        }
    }
}

/// The crime-type choice made in the dashboard.
///
/// Serialized as the same text shown in the selector, so
/// [`COMBINED_CRIMES_LABEL`] round-trips to [`CrimeSelector::Combined`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CrimeSelector {
    /// Aggregate across every crime type.
    Combined,
    /// A single named crime type.
    Single(String),
}

impl CrimeSelector {
    /// Returns `true` for the combined selector.
    #[must_use]
    pub const fn is_combined(&self) -> bool {
        matches!(self, Self::Combined)
    }

    /// Returns `true` if a row with the given crime type belongs to this
    /// selection.
    #[must_use]
    pub fn matches(&self, crime_type: &str) -> bool {
        match self {
            Self::Combined => true,
            Self::Single(name) => name == crime_type,
        }
    }

    /// Returns the label shown in the selector.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Combined => COMBINED_CRIMES_LABEL,
            Self::Single(name) => name,
        }
    }
}

impl From<&str> for CrimeSelector {
    fn from(value: &str) -> Self {
        if value == COMBINED_CRIMES_LABEL {
            Self::Combined
        } else {
            Self::Single(value.to_owned())
        }
    }
}

impl From<String> for CrimeSelector {
    fn from(value: String) -> Self {
        if value == COMBINED_CRIMES_LABEL {
            Self::Combined
        } else {
            Self::Single(value)
        }
    }
}

impl From<CrimeSelector> for String {
    fn from(value: CrimeSelector) -> Self {
        match value {
            CrimeSelector::Combined => COMBINED_CRIMES_LABEL.to_owned(),
            CrimeSelector::Single(name) => name,
        }
    }
}

impl FromStr for CrimeSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for CrimeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Builds the crime selector options: the combined label first, then the
/// given crime types in the order supplied.
#[must_use]
pub fn crime_selector_options(crime_types: &[String]) -> Vec<String> {
    std::iter::once(COMBINED_CRIMES_LABEL.to_owned())
        .chain(crime_types.iter().cloned())
        .collect()
}
