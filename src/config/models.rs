use crate::metadata::FilterMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpSettings,
}

/// Song list location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("songs.txt")
}

/// Download destination
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("songs")
}

/// Batch dispatcher settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Capacity of the bounded name queue, which is also the batch size
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// How the metadata API interprets each title
    #[serde(default)]
    pub filter: FilterMode,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            filter: FilterMode::default(),
        }
    }
}

fn default_queue_capacity() -> usize {
    10
}

/// Metadata API endpoint and provider fallback order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Provider ids, tried in order for every query
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
    #[serde(default = "default_page")]
    pub page: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            providers: default_providers(),
            page: default_page(),
        }
    }
}

fn default_endpoint() -> String {
    "http://music.sonimei.cn".to_string()
}

fn default_providers() -> Vec<String> {
    [
        "netease", "qq", "kugou", "kuwo", "xiami", "baidu", "1ting", "migu", "lizhi",
        "qingting", "ximalaya", "kg",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_page() -> u32 {
    1
}

/// HTTP client and retry settings shared by metadata queries and asset downloads
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Total attempts per request, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

// Audio files can be large on slow mirrors.
fn default_request_timeout_secs() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    format!("songfetch/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.input.path, PathBuf::from("songs.txt"));
        assert_eq!(config.output.dir, PathBuf::from("songs"));
        assert_eq!(config.dispatch.queue_capacity, 10);
        assert_eq!(config.dispatch.filter, FilterMode::Name);
        assert_eq!(config.api.providers.len(), 12);
        assert_eq!(config.api.providers[0], "netease");
        assert_eq!(config.api.providers[11], "kg");
        assert_eq!(config.api.page, 1);
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.http.retry_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[dispatch]
queue_capacity = 4

[http]
retry_delay_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatch.queue_capacity, 4);
        assert_eq!(config.dispatch.filter, FilterMode::Name);
        assert_eq!(config.http.retry_delay(), Duration::from_millis(50));
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.api.endpoint, "http://music.sonimei.cn");
    }
}
