//! Configuration management for songfetch
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! The defaults alone describe a complete run: read `songs.txt`, download into
//! `songs/`, ten names per batch.
//!
//! # Usage
//!
//! ```no_run
//! use songfetch::config::Config;
//!
//! let config = Config::load(None).expect("Failed to load configuration");
//! println!("Reading songs from: {}", config.input.path.display());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `SONGFETCH__<section>__<key>`
//!
//! Examples:
//! - `SONGFETCH__DISPATCH__QUEUE_CAPACITY=4`
//! - `SONGFETCH__API__PROVIDERS=qq,kugou,netease`
//! - `SONGFETCH__HTTP__REQUEST_TIMEOUT_SECS=120`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/songfetch.toml`.
//! This can be overridden using the `SONGFETCH_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{ApiConfig, Config, DispatchConfig, HttpSettings, InputConfig, OutputConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// `path` overrides the file location; otherwise `SONGFETCH_CONFIG` or
    /// `config/songfetch.toml` is used. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load(path: Option<std::path::PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path, skipping `.env`
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Re-check invariants, e.g. after CLI overrides were applied
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[output]
dir = "downloads"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.output.dir, std::path::PathBuf::from("downloads"));
        assert_eq!(config.api.providers.len(), 12);
    }

    #[test]
    fn test_validation_catches_zero_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[dispatch]
queue_capacity = 0
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::ZeroQueueCapacity)
        ));
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[dispatch\nqueue_capacity = ").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result.unwrap_err(), ConfigError::LoadError(_)));
    }
}
