use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use log::warn;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Request pacing and retry settings
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Output location settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Subtitle track selection
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Path of the cookie file
    #[serde(default = "default_cookies_path")]
    pub cookies_path: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP client configuration, passed to the client constructor
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the platform API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Prefix of the Referer header; the BV id is appended
    #[serde(default = "default_referer_base")]
    pub referer_base: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            api_base: default_api_base(),
            referer_base: default_referer_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Request pacing configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Minimum delay in milliseconds between consecutive requests
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Retry count for throttled requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Output location configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Directory under which per-video directories are created
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Prefix of per-video directory names
    #[serde(default = "default_dir_prefix")]
    pub dir_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            dir_prefix: default_dir_prefix(),
        }
    }
}

/// Configuration for subtitle track selection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SubtitleConfig {
    /// Preferred `lan` code (e.g. "zh-CN", "ai-zh"); first track when unset
    #[serde(default)]
    pub preferred_language: Option<String>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36".to_string()
}

fn default_api_base() -> String {
    "https://api.bilibili.com".to_string()
}

fn default_referer_base() -> String {
    "https://www.bilibili.com/video/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_request_delay_ms() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_dir_prefix() -> String {
    "output_".to_string()
}

fn default_cookies_path() -> PathBuf {
    PathBuf::from("cookies.txt")
}

impl Config {
    /// Load the configuration from `path`, writing a default file if none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::Config("http.user_agent must not be empty".to_string()).into());
        }

        if !self.http.api_base.starts_with("http") {
            return Err(AppError::Config(format!("http.api_base must be an http(s) URL: {}", self.http.api_base)).into());
        }

        if self.http.timeout_secs == 0 {
            return Err(AppError::Config("http.timeout_secs must be greater than zero".to_string()).into());
        }

        if self.output.dir_prefix.is_empty() {
            return Err(AppError::Config("output.dir_prefix must not be empty".to_string()).into());
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            http: HttpConfig::default(),
            rate_limit: RateLimitConfig::default(),
            output: OutputConfig::default(),
            subtitles: SubtitleConfig::default(),
            cookies_path: default_cookies_path(),
            log_level: LogLevel::default(),
        }
    }
}
