#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Layered configuration for the crime dashboard.
//!
//! Values are resolved in order: built-in defaults, an optional TOML file,
//! then environment variable overrides. Front ends apply their own CLI
//! flags on top of the returned [`DashboardConfig`].

pub mod paths;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CRIME_DASH_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "crime_dash.toml";

/// Environment variable overriding [`DashboardConfig::data_path`].
pub const DATA_PATH_ENV: &str = "CRIME_DASH_DATA";

/// Environment variable overriding [`DashboardConfig::model_path`].
pub const MODEL_PATH_ENV: &str = "CRIME_DASH_MODEL";

/// Environment variable overriding [`YearPolicy::ceiling`].
pub const MAX_YEAR_ENV: &str = "CRIME_DASH_MAX_YEAR";

/// Environment variable overriding [`ServerConfig::bind_addr`].
pub const BIND_ADDR_ENV: &str = "BIND_ADDR";

/// Environment variable overriding [`ServerConfig::port`].
pub const PORT_ENV: &str = "PORT";

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`DashboardConfig`].
    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// An environment override has an unusable value.
    #[error("Invalid value '{value}' for {var}: {message}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// Year selector policy.
///
/// The ceiling is a UI convenience rather than a data constraint: the
/// model extrapolates to any year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct YearPolicy {
    /// Largest year the selector offers.
    pub ceiling: i32,
    /// Year preselected in the selector.
    pub default: i32,
}

impl Default for YearPolicy {
    fn default() -> Self {
        Self {
            ceiling: 2050,
            default: 2030,
        }
    }
}

/// HTTP server bind settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// TCP port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Fully resolved dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DashboardConfig {
    /// Processed crime dataset (CSV).
    pub data_path: PathBuf,
    /// Serialized regression model (JSON).
    pub model_path: PathBuf,
    /// Year selector policy.
    pub years: YearPolicy,
    /// HTTP server bind settings.
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: paths::default_data_path(),
            model_path: paths::default_model_path(),
            years: YearPolicy::default(),
            server: ServerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Resolves configuration from the process environment.
    ///
    /// The config file is `explicit` if given, else the file named by
    /// [`CONFIG_ENV`], else [`DEFAULT_CONFIG_FILE`] if it exists in the
    /// working directory. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file cannot be read or parsed,
    /// or an environment override is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                fallback.is_file().then_some(fallback)
            });

        let mut config = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|var| std::env::var(var).ok())?;

        Ok(config)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Reading config file {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::de::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a numeric override does not
    /// parse.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup(DATA_PATH_ENV) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(MODEL_PATH_ENV) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(MAX_YEAR_ENV) {
            self.years.ceiling = parse_env(MAX_YEAR_ENV, &value)?;
        }
        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            self.server.bind_addr = addr;
        }
        if let Some(value) = lookup(PORT_ENV) {
            self.server.port = parse_env(PORT_ENV, &value)?;
        }
        Ok(())
    }
}

fn parse_env<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnv {
            var,
            value: value.to_owned(),
            message: e.to_string(),
        })
}
