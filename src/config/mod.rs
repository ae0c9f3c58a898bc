//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the tournament registry inside the data directory.
pub const REGISTRY_FILE_NAME: &str = "tournament_registry.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Upstream ATP endpoints and probing behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the per-match stats resource (`/{year}/{tournament}/{match}` is appended)
    #[serde(default = "default_match_stats_url")]
    pub match_stats_url: String,

    /// Base URL of the head-to-head resource (`/{player1}/{player2}` is appended)
    #[serde(default = "default_h2h_url")]
    pub h2h_url: String,

    /// Tour calendar used to build the registry
    #[serde(default = "default_calendar_url")]
    pub calendar_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Number of qualifying-draw match ids to probe. Real qualifying draw
    /// sizes are not tracked, so this is an approximation.
    #[serde(default = "default_max_qualifiers")]
    pub max_qualifiers: i64,

    /// Draw size assumed for tournaments missing from the registry
    #[serde(default = "default_draw_size")]
    pub default_draw_size: i64,

    /// Max concurrent match probes per request
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

fn default_match_stats_url() -> String {
    "https://www.atptour.com/-/Hawkeye/MatchStats/Complete".to_string()
}

fn default_h2h_url() -> String {
    "https://www.atptour.com/en/-/tour/Head2HeadSearch/GetHead2HeadData".to_string()
}

fn default_calendar_url() -> String {
    "https://www.atptour.com/en/-/tournaments/calendar/tour".to_string()
}

fn default_user_agent() -> String {
    "TennisAPI/1.0 (Unofficial ATP wrapper)".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_qualifiers() -> i64 {
    20
}

fn default_draw_size() -> i64 {
    32
}

fn default_fetch_concurrency() -> usize {
    8
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            match_stats_url: default_match_stats_url(),
            h2h_url: default_h2h_url(),
            calendar_url: default_calendar_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            max_qualifiers: default_max_qualifiers(),
            default_draw_size: default_draw_size(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            upstream: UpstreamConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if self.upstream.fetch_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "Fetch concurrency must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join(REGISTRY_FILE_NAME)
    }
}
