//! Configuration loading and API key resolution
//!
//! Bootstrap settings come from a small TOML file. Every field has a
//! built-in default, so a missing file is not fatal: the tools warn and
//! continue with defaults.
//!
//! # Settings Sources Priority (setlist.fm API key)
//!
//! 1. Command-line argument (`--api-key`)
//! 2. Environment variable (`SETLISTFM_API_KEY`)
//! 3. TOML configuration file (`setlistfm_api_key`)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the setlist.fm API key
pub const API_KEY_ENV_VAR: &str = "SETLISTFM_API_KEY";

/// setlist.fm REST endpoint
pub const DEFAULT_SETLISTFM_BASE_URL: &str = "https://api.setlist.fm/rest/1.0";

/// Seconds between API requests (0.25 req/sec, well under the published 2 req/sec)
pub const DEFAULT_REQUEST_INTERVAL_SECS: f64 = 4.0;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// setlist.fm API key (optional; CLI and ENV take priority)
    #[serde(default)]
    pub setlistfm_api_key: Option<String>,

    /// Base URL of the setlist.fm REST API
    #[serde(default = "default_base_url")]
    pub setlistfm_base_url: String,

    /// Minimum delay between two API requests, in seconds
    #[serde(default = "default_request_interval_secs")]
    pub request_interval_secs: f64,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_SETLISTFM_BASE_URL.to_string()
}

fn default_request_interval_secs() -> f64 {
    DEFAULT_REQUEST_INTERVAL_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            setlistfm_api_key: None,
            setlistfm_base_url: default_base_url(),
            request_interval_secs: default_request_interval_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Minimum interval between API requests
    ///
    /// Negative or non-finite values disable the delay.
    pub fn request_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_interval_secs).unwrap_or(Duration::ZERO)
    }
}

/// Default config file location (`~/.config/eam/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("eam").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load configuration with graceful degradation
///
/// An explicitly requested file must exist and parse. Without one, the
/// default location is tried; if nothing is there the built-in defaults
/// are used.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return load_toml_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => load_toml_config(&path),
        Some(path) => {
            warn!(
                "No config file at {}, using built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Resolve the setlist.fm API key from CLI → ENV → TOML
///
/// Blank values are skipped. Fails with [`Error::Config`] when no source
/// provides a key.
pub fn resolve_setlistfm_api_key(cli_key: Option<&str>, toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV_VAR).ok();

    let candidates = [
        ("command line", cli_key.map(str::to_string)),
        ("environment", env_key),
        ("TOML", toml_config.setlistfm_api_key.clone()),
    ];

    let valid: Vec<(&str, String)> = candidates
        .into_iter()
        .filter_map(|(source, key)| key.filter(|k| is_valid_key(k)).map(|k| (source, k)))
        .collect();

    if valid.len() > 1 {
        let sources: Vec<&str> = valid.iter().map(|(source, _)| *source).collect();
        warn!(
            "setlist.fm API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    match valid.into_iter().next() {
        Some((source, key)) => {
            info!("setlist.fm API key loaded from {}", source);
            Ok(key.trim().to_string())
        }
        None => Err(Error::Config(format!(
            "setlist.fm API key not configured. Please configure using one of:\n\
             1. Command line: --api-key your-key-here\n\
             2. Environment: {}=your-key-here\n\
             3. TOML config: ~/.config/eam/config.toml (setlistfm_api_key = \"your-key\")\n\
             \n\
             Obtain API key at: https://www.setlist.fm/settings/api",
            API_KEY_ENV_VAR
        ))),
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
