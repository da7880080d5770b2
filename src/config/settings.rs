use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable holding the statistics API credential.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Statistics API access.
///
/// `api_key` may be absent; only the collector's fetch step requires it.
#[derive(Debug, Deserialize, Clone)]
pub struct YoutubeSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_video_id")]
    pub video_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_video_id() -> String {
    "i2tFPyw6Iqg".to_string()
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            video_id: default_video_id(),
            api_base_url: default_api_base_url(),
        }
    }
}

/// Location of the SQLite file shared by collector and dashboard.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    "youtube_stats.db".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Dashboard HTTP server and history cache.
#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// How long a loaded history stays fresh before the next request reloads it
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8501".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    600 // 10 minutes
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Root application configuration.
///
/// Sources, lowest precedence first:
/// - optional `config.{yaml,toml,json}` in the working directory
/// - `VIEWTRACK__<SECTION>__<KEY>` environment variables
/// - `YOUTUBE_API_KEY` for the credential
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub youtube: YoutubeSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load("config")
    }

    /// Loads settings using `file` (extension optional) as the base layer.
    pub fn load(file: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("VIEWTRACK").separator("__"))
            .set_override_option("youtube.api_key", std::env::var(API_KEY_ENV).ok())?
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
