#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard computations over the loaded dataset and model.
//!
//! [`features::build`] reconstructs the one-hot model input from the
//! user's selections, [`trend::trend`] and [`comparison::comparison`]
//! aggregate the crime table for the two charts, and
//! [`dashboard::Dashboard`] ties them into a single request handler.
//! Everything except resource loading is a pure in-memory transform.

pub mod comparison;
pub mod dashboard;
pub mod features;
pub mod trend;

use crime_dash_analytics_models::ErrorKind;
use crime_dash_crime_models::SchemaError;
use crime_dash_dataset::DatasetError;
use crime_dash_model::ModelError;
use thiserror::Error;

pub use dashboard::Dashboard;

/// Errors surfaced to the user by a dashboard interaction.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The crime dataset could not be loaded.
    #[error("Data unavailable: {0}")]
    DataUnavailable(#[from] DatasetError),

    /// The model artifact could not be loaded.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(ModelError),

    /// The feature vector does not fit the model's schema.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the disagreement.
        message: String,
    },
}

impl DashboardError {
    /// Returns the user-facing error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DataUnavailable(_) => ErrorKind::DataUnavailable,
            Self::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Self::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
        }
    }
}

impl From<ModelError> for DashboardError {
    fn from(e: ModelError) -> Self {
        if e.is_schema_mismatch() {
            Self::SchemaMismatch {
                message: e.to_string(),
            }
        } else {
            Self::ModelUnavailable(e)
        }
    }
}

impl From<SchemaError> for DashboardError {
    fn from(e: SchemaError) -> Self {
        Self::SchemaMismatch {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn model_errors_split_by_kind() {
        let mismatch: DashboardError = ModelError::SchemaMismatch {
            missing: vec!["State_X".to_owned()],
            unexpected: Vec::new(),
        }
        .into();
        assert_eq!(mismatch.kind(), ErrorKind::SchemaMismatch);

        let missing: DashboardError = ModelError::NotFound {
            path: PathBuf::from("models/absent.json"),
        }
        .into();
        assert_eq!(missing.kind(), ErrorKind::ModelUnavailable);
    }

    #[test]
    fn schema_errors_are_schema_mismatch() {
        let err: DashboardError = SchemaError::MissingYear.into();
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
        assert!(err.to_string().contains("Year"));
    }
}
