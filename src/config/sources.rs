use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "SONGFETCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/songfetch.toml";
const ENV_PREFIX: &str = "SONGFETCH";
const ENV_SEPARATOR: &str = "__";

/// Resolve which configuration file to read.
///
/// An explicit path wins, then `SONGFETCH_CONFIG`, then `config/songfetch.toml`.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load(explicit: Option<PathBuf>) -> Result<Config, ConfigError> {
    // A missing .env is the normal case
    let _ = dotenvy::dotenv();

    load_from_sources(config_path(explicit))
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // SONGFETCH__DISPATCH__QUEUE_CAPACITY -> dispatch.queue_capacity
    // SONGFETCH__API__PROVIDERS=qq,kugou -> api.providers
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .list_separator(",")
            .with_list_parse_key("api.providers")
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FilterMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.dispatch.queue_capacity, 10);
        assert_eq!(config.output.dir, PathBuf::from("songs"));
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[input]
path = "lists/favourites.txt"

[dispatch]
queue_capacity = 3
filter = "id"

[api]
endpoint = "http://127.0.0.1:9000"
providers = ["qq", "kugou"]
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.input.path, PathBuf::from("lists/favourites.txt"));
        assert_eq!(config.dispatch.queue_capacity, 3);
        assert_eq!(config.dispatch.filter, FilterMode::Id);
        assert_eq!(config.api.providers, vec!["qq", "kugou"]);
        assert_eq!(config.http.max_attempts, 3);
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = config_path(Some(PathBuf::from("custom.toml")));
        assert_eq!(path, PathBuf::from("custom.toml"));
    }
}
