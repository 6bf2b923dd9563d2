use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::SelectionPolicy;
use crate::services::custom_intros::default_video_extensions;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON catalog snapshot serving library, users and ratings
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Remote channel API base URL; the catalog's channel trailers are used when unset
    #[serde(default)]
    pub channel_api_url: Option<String>,

    /// Per-request timeout for the channel API
    #[serde(default = "default_channel_timeout_secs")]
    pub channel_timeout_secs: u64,

    #[serde(default = "enabled")]
    pub enable_intros_for_movies: bool,

    #[serde(default)]
    pub enable_intros_for_episodes: bool,

    #[serde(default = "enabled")]
    pub enable_library_trailers: bool,

    #[serde(default = "enabled")]
    pub enable_remote_trailers: bool,

    #[serde(default = "enabled")]
    pub enable_custom_intro: bool,

    #[serde(default = "enabled")]
    pub enable_parental_filter: bool,

    #[serde(default)]
    pub enable_watched_content: bool,

    /// Directory holding custom intro clips
    #[serde(default)]
    pub custom_intro_path: Option<PathBuf>,

    /// Comma-separated list of extensions counted as intro clips
    #[serde(default = "default_video_extensions")]
    pub intro_video_extensions: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

fn default_channel_timeout_secs() -> u64 {
    10
}

fn enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
            .validate()
    }

    /// Rejects values that would make every selection fail
    pub fn validate(self) -> anyhow::Result<Self> {
        if self.channel_timeout_secs == 0 {
            anyhow::bail!("CHANNEL_TIMEOUT_SECS must be greater than zero");
        }
        Ok(self)
    }

    pub fn channel_timeout(&self) -> Duration {
        Duration::from_secs(self.channel_timeout_secs)
    }

    /// Intro selection policy described by this configuration
    pub fn policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            enable_for_movies: self.enable_intros_for_movies,
            enable_for_episodes: self.enable_intros_for_episodes,
            enable_library_trailers: self.enable_library_trailers,
            enable_remote_trailers: self.enable_remote_trailers,
            enable_custom_intro: self.enable_custom_intro,
            enable_parental_filter: self.enable_parental_filter,
            enable_watched_content: self.enable_watched_content,
            custom_intro_path: self.custom_intro_path.clone(),
        }
    }
}
