//! The dashboard request handler.
//!
//! A front end turns each user interaction into a [`DashboardRequest`] and
//! renders the [`DashboardResponse`]. The dataset is loaded on the first
//! request; the model only on the first prediction.

use std::sync::Arc;

use crime_dash_analytics_models::{
    ComparisonSeries, DashboardAction, DashboardOptions, DashboardRequest, DashboardResponse,
    Prediction, Selection, TrendSeries, YearBounds,
};
use crime_dash_config::{DashboardConfig, YearPolicy};
use crime_dash_crime_models::{CrimeSelector, crime_selector_options};
use crime_dash_dataset::{CrimeTable, DatasetSource};
use crime_dash_model::{ModelSource, RegressionModel};

use crate::{DashboardError, comparison, features, trend};

/// Derives the selectable year range from the loaded table and policy.
///
/// The floor is the earliest year in the data; the ceiling is the
/// configured policy, raised to the floor if the data runs past it.
#[must_use]
pub fn year_bounds(table: &CrimeTable, policy: &YearPolicy) -> YearBounds {
    let min = table.min_year().unwrap_or(policy.default);
    let max = policy.ceiling.max(min);

    YearBounds {
        min,
        max,
        default: policy.default.clamp(min, max),
    }
}

/// Derives the selector choices from the loaded table and year policy.
#[must_use]
pub fn options(table: &CrimeTable, policy: &YearPolicy) -> DashboardOptions {
    DashboardOptions {
        states: table.distinct_states(),
        crime_options: crime_selector_options(&table.distinct_crime_types()),
        years: year_bounds(table, policy),
    }
}

/// Runs the model for one selection.
///
/// # Errors
///
/// Returns [`DashboardError::SchemaMismatch`] if the model rejects the
/// reconstructed feature vector.
pub fn predict(
    model: &dyn RegressionModel,
    selection: &Selection,
) -> Result<Prediction, DashboardError> {
    let vector = features::build(
        model.feature_names(),
        &selection.state,
        &selection.crime,
        selection.year,
    );
    let value = model.predict(&vector)?;
    log::debug!(
        "Predicted {value} for {} / {} / {}",
        selection.state,
        selection.crime,
        selection.year
    );
    Ok(Prediction::from_value(value))
}

/// Injected resources behind every dashboard interaction.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<DatasetSource>,
    model: Arc<ModelSource>,
    years: YearPolicy,
}

impl Dashboard {
    /// Creates a dashboard over the given resources.
    #[must_use]
    pub const fn new(dataset: Arc<DatasetSource>, model: Arc<ModelSource>, years: YearPolicy) -> Self {
        Self {
            dataset,
            model,
            years,
        }
    }

    /// Creates a dashboard whose resources load from the configured paths.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            Arc::new(DatasetSource::new(&config.data_path)),
            Arc::new(ModelSource::new(&config.model_path)),
            config.years,
        )
    }

    /// Returns the dataset resource.
    #[must_use]
    pub fn dataset(&self) -> &DatasetSource {
        &self.dataset
    }

    /// Returns the model resource.
    #[must_use]
    pub fn model(&self) -> &ModelSource {
        &self.model
    }

    /// Returns the selector choices.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::DataUnavailable`] if the dataset cannot be
    /// loaded.
    pub fn options(&self) -> Result<DashboardOptions, DashboardError> {
        let table = self.dataset.load()?;
        Ok(options(&table, &self.years))
    }

    /// Returns the selectable year range without building the state and
    /// crime type lists.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::DataUnavailable`] if the dataset cannot be
    /// loaded.
    pub fn year_bounds(&self) -> Result<YearBounds, DashboardError> {
        let table = self.dataset.load()?;
        Ok(year_bounds(&table, &self.years))
    }

    /// Computes the trend series for a state and crime selection.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::DataUnavailable`] if the dataset cannot be
    /// loaded.
    pub fn trend(&self, state: &str, crime: &CrimeSelector) -> Result<TrendSeries, DashboardError> {
        let table = self.dataset.load()?;
        Ok(trend::trend(&table, state, crime))
    }

    /// Computes the comparison series for a state.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::DataUnavailable`] if the dataset cannot be
    /// loaded.
    pub fn comparison(&self, state: &str) -> Result<ComparisonSeries, DashboardError> {
        let table = self.dataset.load()?;
        Ok(comparison::comparison(&table, state))
    }

    /// Runs the model for one selection.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::ModelUnavailable`] if the model cannot be
    /// loaded, or [`DashboardError::SchemaMismatch`] if it rejects the
    /// feature vector.
    pub fn predict(&self, selection: &Selection) -> Result<Prediction, DashboardError> {
        let model = self.model.load()?;
        predict(model.as_ref(), selection)
    }

    /// Handles one dashboard interaction.
    ///
    /// Charts are always recomputed; the model runs only for
    /// [`DashboardAction::Predict`].
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if a required resource cannot be loaded
    /// or the model rejects the feature vector.
    pub fn handle(&self, request: &DashboardRequest) -> Result<DashboardResponse, DashboardError> {
        let selection = &request.selection;
        let table = self.dataset.load()?;

        let prediction = match request.action {
            DashboardAction::Predict => Some(self.predict(selection)?),
            DashboardAction::Refresh => None,
        };

        Ok(DashboardResponse {
            selection: selection.clone(),
            prediction,
            trend: trend::trend(&table, &selection.state, &selection.crime),
            comparison: comparison::comparison(&table, &selection.state),
        })
    }
}
