//! Default locations of the dashboard's input artifacts.
//!
//! Paths are relative to the working directory the dashboard is started
//! from.

use std::path::{Path, PathBuf};

/// Returns the `data/processed/` directory.
#[must_use]
pub fn processed_dir() -> PathBuf {
    PathBuf::from("data").join("processed")
}

/// Returns the `models/` directory.
#[must_use]
pub fn models_dir() -> PathBuf {
    PathBuf::from("models")
}

/// Returns the default processed dataset path.
#[must_use]
pub fn default_data_path() -> PathBuf {
    processed_dir().join("crime_data_cleaned.csv")
}

/// Returns the default model artifact path.
#[must_use]
pub fn default_model_path() -> PathBuf {
    models_dir().join("crime_prediction_model.json")
}

/// Returns `path` joined onto the working directory when it is relative.
///
/// Used for log messages so a missing file is reported with the location
/// actually searched.
#[must_use]
pub fn display_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}
