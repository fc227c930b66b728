//! Model feature schema and feature vector types.
//!
//! A trained model expects one numeric `Year` feature plus two families of
//! one-hot indicators named `State_<name>` and `Crime_Type_<name>`.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Name of the numeric year feature.
pub const YEAR_FEATURE: &str = "Year";

/// A family of one-hot indicator features sharing a name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum IndicatorFamily {
    /// `State_<name>` indicators.
    #[strum(serialize = "State_")]
    State,
    /// `Crime_Type_<name>` indicators.
    #[strum(serialize = "Crime_Type_")]
    CrimeType,
}

impl IndicatorFamily {
    /// Returns the feature name prefix for this family.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        self.into()
    }

    /// Returns the indicator feature name for a category value.
    #[must_use]
    pub fn feature_name(self, value: &str) -> String {
        format!("{}{value}", self.prefix())
    }

    /// Returns `true` if `name` belongs to this family.
    #[must_use]
    pub fn owns(self, name: &str) -> bool {
        name.starts_with(self.prefix())
    }
}

/// Errors raised when a list of feature names is not a usable schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The schema does not contain the numeric year feature.
    #[error("feature schema has no `Year` feature")]
    MissingYear,

    /// A feature name appears more than once.
    #[error("feature schema lists `{name}` more than once")]
    Duplicate {
        /// The repeated feature name.
        name: String,
    },
}

/// The ordered list of input names a trained model expects.
///
/// Construction guarantees the names are unique and include
/// [`YEAR_FEATURE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Validates and wraps an ordered list of feature names.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a name is repeated or the year feature
    /// is missing.
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::Duplicate { name: name.clone() });
            }
        }
        if !seen.contains(YEAR_FEATURE) {
            return Err(SchemaError::MissingYear);
        }
        Ok(Self { names })
    }

    /// Returns the feature names in model order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; a valid schema contains at least the year feature.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns `true` if the schema contains `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns the position of `name` in model order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Iterates over the indicator features of one family, in model order.
    pub fn indicators(&self, family: IndicatorFamily) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(move |name| family.owns(name))
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(value: FeatureSchema) -> Self {
        value.names
    }
}

/// A mapping from feature name to numeric model input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    /// Creates a vector with every schema feature set to zero.
    #[must_use]
    pub fn zeroed(schema: &FeatureSchema) -> Self {
        schema.names().iter().map(|n| (n.clone(), 0.0)).collect()
    }

    /// Returns the value of a feature, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Sets a feature value, inserting the name if absent.
    pub fn set(&mut self, name: &str, value: f64) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        } else {
            self.values.insert(name.to_owned(), value);
        }
    }

    /// Returns the number of features carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the vector carries no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sums the values of one indicator family.
    #[must_use]
    pub fn indicator_sum(&self, family: IndicatorFamily) -> f64 {
        self.iter()
            .filter(|(name, _)| family.owns(name))
            .map(|(_, value)| value)
            .sum()
    }

    /// Returns the schema names this vector does not supply.
    #[must_use]
    pub fn missing_from(&self, schema: &FeatureSchema) -> Vec<String> {
        schema
            .names()
            .iter()
            .filter(|n| !self.values.contains_key(n.as_str()))
            .cloned()
            .collect()
    }

    /// Returns the names this vector supplies that the schema does not
    /// expect.
    #[must_use]
    pub fn unexpected_for(&self, schema: &FeatureSchema) -> Vec<String> {
        self.values
            .keys()
            .filter(|n| !schema.contains(n))
            .cloned()
            .collect()
    }
}

impl FromIterator<(String, f64)> for FeatureVector {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
