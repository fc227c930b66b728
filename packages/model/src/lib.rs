#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Load-once access to the trained crime regression model.
//!
//! The model artifact is a JSON document tagged by `"kind"`
//! (`linear`, `random_forest`, or `gradient_boosting`) carrying the
//! ordered feature names the model was trained on. [`ModelSource`] reads
//! it on first use and hands out the shared [`RegressionModel`].

pub mod linear;
pub mod tree;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crime_dash_crime_models::{FeatureSchema, FeatureVector};
use serde::Deserialize;
use thiserror::Error;

pub use linear::LinearModel;
pub use tree::{DecisionTree, GradientBoostingModel, RandomForestModel};

/// Errors raised while loading or invoking the model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No file exists at the configured path.
    #[error("Model artifact not found at {}", .path.display())]
    NotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("Failed to read model artifact {}: {source}", .path.display())]
    Io {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact is not a decodable model document.
    #[error("Failed to decode model artifact: {0}")]
    Decode(#[from] serde_json::Error),

    /// The artifact decoded but is internally inconsistent.
    #[error("Model artifact is inconsistent: {message}")]
    Invalid {
        /// Description of the inconsistency.
        message: String,
    },

    /// A feature vector does not supply exactly the model's features.
    #[error("Feature vector does not match the model schema (missing: {missing:?}, unexpected: {unexpected:?})")]
    SchemaMismatch {
        /// Schema names the vector did not supply.
        missing: Vec<String>,
        /// Vector names the schema does not expect.
        unexpected: Vec<String>,
    },
}

impl ModelError {
    /// Returns `true` for a feature vector / schema disagreement, as
    /// opposed to the model itself being unavailable.
    #[must_use]
    pub const fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::SchemaMismatch { .. })
    }
}

/// A trained regression model over a fixed feature schema.
pub trait RegressionModel: Send + Sync {
    /// The ordered feature names the model was trained on.
    fn feature_names(&self) -> &FeatureSchema;

    /// Predicts from inputs already arranged in schema order.
    ///
    /// `inputs.len()` equals `self.feature_names().len()`.
    fn predict_ordered(&self, inputs: &[f64]) -> f64;

    /// Short name of the model family, for logs.
    fn kind(&self) -> &'static str;

    /// Predicts from a named feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SchemaMismatch`] unless the vector supplies
    /// exactly the names in [`Self::feature_names`].
    fn predict(&self, vector: &FeatureVector) -> Result<f64, ModelError> {
        let inputs = ordered_inputs(self.feature_names(), vector)?;
        Ok(self.predict_ordered(&inputs))
    }
}

/// Arranges a feature vector in schema order.
///
/// # Errors
///
/// Returns [`ModelError::SchemaMismatch`] listing missing and unexpected
/// names when the vector's keys differ from the schema.
pub fn ordered_inputs(
    schema: &FeatureSchema,
    vector: &FeatureVector,
) -> Result<Vec<f64>, ModelError> {
    let missing = vector.missing_from(schema);
    let unexpected = vector.unexpected_for(schema);
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(ModelError::SchemaMismatch {
            missing,
            unexpected,
        });
    }

    Ok(schema
        .names()
        .iter()
        .filter_map(|name| vector.get(name))
        .collect())
}

/// A decoded model artifact.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// Linear regression.
    Linear(LinearModel),
    /// Averaging tree ensemble.
    RandomForest(RandomForestModel),
    /// Additive tree ensemble.
    GradientBoosting(GradientBoostingModel),
}

impl ModelArtifact {
    /// Decodes and validates an artifact from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Decode`] for undecodable JSON and
    /// [`ModelError::Invalid`] for an inconsistent model.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Reads, decodes, and validates the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the file is missing, unreadable, or not a
    /// valid model.
    pub fn read(path: &Path) -> Result<Self, ModelError> {
        if !path.is_file() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Linear(model) => model.validate(),
            Self::RandomForest(model) => model.validate(),
            Self::GradientBoosting(model) => model.validate(),
        }
    }

    fn inner(&self) -> &dyn RegressionModel {
        match self {
            Self::Linear(model) => model,
            Self::RandomForest(model) => model,
            Self::GradientBoosting(model) => model,
        }
    }
}

impl RegressionModel for ModelArtifact {
    fn feature_names(&self) -> &FeatureSchema {
        self.inner().feature_names()
    }

    fn predict_ordered(&self, inputs: &[f64]) -> f64 {
        self.inner().predict_ordered(inputs)
    }

    fn kind(&self) -> &'static str {
        self.inner().kind()
    }
}

/// Lazily loaded, process-lifetime regression model.
pub struct ModelSource {
    path: PathBuf,
    model: OnceLock<Arc<dyn RegressionModel>>,
    load_lock: Mutex<()>,
}

impl ModelSource {
    /// Creates a source that will read the artifact at `path` on first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            model: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Creates a source that is already populated with `model`.
    #[must_use]
    pub fn from_model(model: Arc<dyn RegressionModel>) -> Self {
        let source = Self::new(PathBuf::new());
        let _ = source.model.set(model);
        source
    }

    /// Returns the configured artifact path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once the model has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Returns the cached model, reading the artifact on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the artifact is missing or corrupt. A
    /// failed load is not cached; the next call tries again.
    pub fn load(&self) -> Result<Arc<dyn RegressionModel>, ModelError> {
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }

        log::info!("Loading model artifact from {}", self.path.display());
        let artifact = ModelArtifact::read(&self.path)?;
        log::info!(
            "Loaded {} model with {} features",
            artifact.kind(),
            artifact.feature_names().len()
        );

        let model: Arc<dyn RegressionModel> = Arc::new(artifact);
        Ok(Arc::clone(self.model.get_or_init(|| model)))
    }
}

impl std::fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSource")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR_JSON: &str = r#"{
        "kind": "linear",
        "feature_names": ["Year", "State_X", "State_Y", "Crime_Type_Theft"],
        "coefficients": [1.0, 50.0, 25.0, 10.0],
        "intercept": -2000.0
    }"#;

    fn vector(pairs: &[(&str, f64)]) -> FeatureVector {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    #[test]
    fn decodes_tagged_linear_artifact() {
        let artifact = ModelArtifact::from_json(LINEAR_JSON).unwrap();
        assert_eq!(artifact.kind(), "linear");
        assert_eq!(
            artifact.feature_names().names(),
            ["Year", "State_X", "State_Y", "Crime_Type_Theft"]
        );
    }

    #[test]
    fn predicts_from_named_vector() {
        let artifact = ModelArtifact::from_json(LINEAR_JSON).unwrap();
        let prediction = artifact
            .predict(&vector(&[
                ("Year", 2030.0),
                ("State_X", 1.0),
                ("State_Y", 0.0),
                ("Crime_Type_Theft", 1.0),
            ]))
            .unwrap();
        assert!((prediction - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_and_extra_keys_are_schema_mismatch() {
        let artifact = ModelArtifact::from_json(LINEAR_JSON).unwrap();
        let err = artifact
            .predict(&vector(&[
                ("Year", 2030.0),
                ("State_X", 1.0),
                ("Crime_Type_Theft", 1.0),
                ("State_Z", 1.0),
            ]))
            .unwrap_err();

        assert!(err.is_schema_mismatch());
        match err {
            ModelError::SchemaMismatch {
                missing,
                unexpected,
            } => {
                assert_eq!(missing, vec!["State_Y"]);
                assert_eq!(unexpected, vec!["State_Z"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_kind_fails_to_decode() {
        let err = ModelArtifact::from_json(r#"{"kind":"svm","feature_names":["Year"]}"#)
            .unwrap_err();
        assert!(matches!(err, ModelError::Decode(_)));
    }

    #[test]
    fn schema_without_year_fails_to_decode() {
        let err = ModelArtifact::from_json(
            r#"{"kind":"linear","feature_names":["State_X"],"coefficients":[1.0],"intercept":0.0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Decode(_)));
    }

    #[test]
    fn inconsistent_artifact_is_invalid() {
        let err = ModelArtifact::from_json(
            r#"{"kind":"linear","feature_names":["Year"],"coefficients":[],"intercept":0.0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Invalid { .. }));
    }

    #[test]
    fn decodes_forest_artifact() {
        let artifact = ModelArtifact::from_json(
            r#"{
                "kind": "random_forest",
                "feature_names": ["Year", "State_X"],
                "trees": [{
                    "children_left":  [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature":        [1, -2, -2],
                    "threshold":      [0.5, -2.0, -2.0],
                    "value":          [0.0, 5.0, 15.0]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(artifact.kind(), "random_forest");
        let prediction = artifact
            .predict(&vector(&[("Year", 2024.0), ("State_X", 1.0)]))
            .unwrap();
        assert!((prediction - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn source_loads_artifact_once() {
        let dir = std::env::temp_dir().join("crime_dash_model_load_once");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("crime_prediction_model.json");
        std::fs::write(&path, LINEAR_JSON).unwrap();

        let source = ModelSource::new(&path);
        assert_eq!(source.path(), path.as_path());
        let first = source.load().unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = source.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let source = ModelSource::new(std::env::temp_dir().join("crime_dash_absent_model.json"));
        assert!(matches!(
            source.load().err().unwrap(),
            ModelError::NotFound { .. }
        ));
        assert!(!source.is_loaded());
    }
}
