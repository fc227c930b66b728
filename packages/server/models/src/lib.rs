#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the analytics types to allow independent evolution of the API
//! contract.

use crime_dash_analytics_models::{ErrorKind, Prediction, Selection};
use crime_dash_crime_models::CrimeSelector;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Whether the crime dataset has been loaded.
    pub dataset_loaded: bool,
    /// Whether the model artifact has been loaded.
    pub model_loaded: bool,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable failure message.
    pub error: String,
    /// Failure category, absent for request validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl ApiError {
    /// Creates a request validation error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            kind: None,
        }
    }
}

/// Query parameters for the dashboard endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Selected state.
    pub state: String,
    /// Selected crime type; the combined option when absent.
    pub crime: Option<String>,
    /// Selected year; the configured default when absent.
    pub year: Option<i32>,
    /// `refresh` (default) or `predict`.
    pub action: Option<String>,
}

/// Query parameters for the trend endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendQueryParams {
    /// Selected state.
    pub state: String,
    /// Selected crime type; the combined option when absent.
    pub crime: Option<String>,
}

/// Query parameters for the comparison endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonQueryParams {
    /// Selected state.
    pub state: String,
}

/// Body of a prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictBody {
    /// Selected state.
    pub state: String,
    /// Selected crime type or the combined option.
    pub crime: CrimeSelector,
    /// Selected year.
    pub year: i32,
}

impl From<PredictBody> for Selection {
    fn from(body: PredictBody) -> Self {
        Self {
            state: body.state,
            crime: body.crime,
            year: body.year,
        }
    }
}

/// Response of a prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPrediction {
    /// Selections the prediction was made for.
    pub selection: Selection,
    /// Model output.
    pub prediction: Prediction,
}
