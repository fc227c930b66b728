#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Load-once access to the processed crime dataset.
//!
//! [`DatasetSource`] owns the dataset path and a lazily populated,
//! read-only [`CrimeTable`]. The first successful [`DatasetSource::load`]
//! reads the CSV; every later call returns the cached table. Tests inject
//! fixture tables with [`DatasetSource::from_table`].

pub mod progress;
pub mod reader;
pub mod table;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use thiserror::Error;

use crate::progress::{NullProgress, ProgressCallback};

pub use table::CrimeTable;

/// Errors that make the dataset unavailable.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No file exists at the configured path.
    #[error("Dataset not found at {}", .path.display())]
    NotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// The file exists but could not be opened.
    #[error("Failed to open dataset {}: {source}", .path.display())]
    Io {
        /// Path of the dataset.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The header row lacks a required column.
    #[error("Dataset is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    /// A row could not be decoded.
    #[error("Malformed dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// Lazily loaded, process-lifetime crime table.
pub struct DatasetSource {
    path: PathBuf,
    table: OnceLock<Arc<CrimeTable>>,
    load_lock: Mutex<()>,
}

impl DatasetSource {
    /// Creates a source that will read the CSV at `path` on first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Creates a source that is already populated with `table`.
    #[must_use]
    pub fn from_table(table: CrimeTable) -> Self {
        let source = Self::new(PathBuf::new());
        let _ = source.table.set(Arc::new(table));
        source
    }

    /// Returns the configured dataset path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once the table has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Returns the cached table, reading the file on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file is missing or malformed. A
    /// failed load is not cached; the next call tries again.
    pub fn load(&self) -> Result<Arc<CrimeTable>, DatasetError> {
        self.load_with_progress(&NullProgress)
    }

    /// Same as [`Self::load`], reporting rows read to `progress`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file is missing or malformed.
    pub fn load_with_progress(
        &self,
        progress: &dyn ProgressCallback,
    ) -> Result<Arc<CrimeTable>, DatasetError> {
        if let Some(table) = self.table.get() {
            log::debug!("Using cached dataset ({} records)", table.len());
            return Ok(Arc::clone(table));
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished loading while we waited.
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        log::info!("Loading crime dataset from {}", self.path.display());
        let records = reader::read_file(&self.path, progress)?;
        let table = Arc::new(CrimeTable::new(records));
        log::info!(
            "Loaded {} crime records ({} states, {} crime types)",
            table.len(),
            table.distinct_states().len(),
            table.distinct_crime_types().len()
        );

        Ok(Arc::clone(self.table.get_or_init(|| table)))
    }
}

impl std::fmt::Debug for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetSource")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crime_dash_crime_models::CrimeRecord;

    use super::*;

    #[test]
    fn fixture_source_is_preloaded() {
        let source = DatasetSource::from_table(CrimeTable::new(vec![CrimeRecord::new(
            "X", "Theft", 2020, 1.0,
        )]));
        assert!(source.is_loaded());
        assert_eq!(source.load().unwrap().len(), 1);
    }

    #[test]
    fn loads_file_once() {
        let dir = std::env::temp_dir().join("crime_dash_dataset_load_once");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("crime_data_cleaned.csv");
        std::fs::write(
            &path,
            "State,Crime_Type,Year,Crime_Count\nX,Theft,2020,10\nX,Theft,2021,20\n",
        )
        .unwrap();

        let source = DatasetSource::new(&path);
        assert_eq!(source.path(), path.as_path());
        assert!(!source.is_loaded());
        let first = source.load().unwrap();
        assert_eq!(first.len(), 2);

        // The cached table survives the file disappearing.
        std::fs::remove_file(&path).unwrap();
        let second = source.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_load_is_retried() {
        let dir = std::env::temp_dir().join("crime_dash_dataset_retry");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rows.csv");

        let source = DatasetSource::new(&path);
        assert!(matches!(
            source.load().unwrap_err(),
            DatasetError::NotFound { .. }
        ));
        assert!(!source.is_loaded());

        std::fs::write(&path, "State,Crime_Type,Year,Crime_Count\nX,Theft,2020,10\n").unwrap();
        assert_eq!(source.load().unwrap().len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
