//! TOML-based configuration.
//!
//! Supports a config file (reportal.toml) with environment variable
//! expansion in the service URL.
//!
//! Example configuration:
//! ```toml
//! [service]
//! base_url = "${REPORT_SERVICE_URL}"
//! timeout_secs = 30
//!
//! [lookup]
//! debounce_ms = 500
//! min_term_len = 2
//!
//! [results]
//! page_size = 25
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lookup::{DEFAULT_DEBOUNCE, MIN_TERM_LEN};
use crate::report::DEFAULT_PAGE_SIZE;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub lookup: LookupSettings,
    pub results: ResultSettings,
}

/// Reporting backend endpoint, consumed by the host's transport.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL (supports ${ENV_VAR} expansion).
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ServiceSettings {
    /// Base URL with environment variables expanded.
    pub fn resolved_base_url(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.base_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Lookup resolution tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupSettings {
    /// Quiet interval before a lookup call fires, in milliseconds.
    pub debounce_ms: u64,

    /// Minimum search-term length that reaches the service.
    pub min_term_len: usize,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            min_term_len: MIN_TERM_LEN,
        }
    }
}

impl LookupSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Result display tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResultSettings {
    /// Rows per result page.
    pub page_size: usize,
}

impl Default for ResultSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `REPORTAL_CONFIG`
    /// 2. `./reportal.toml`
    /// 3. `~/.config/reportal/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("REPORTAL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("reportal.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("reportal").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand `${VAR}` references in a string.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let Some(end) = tail.find('}') else {
            // Unterminated reference, keep it verbatim
            result.push_str(&rest[start..]);
            return Ok(result);
        };
        let var_name = &tail[..end];
        let value = env::var(var_name)
            .map_err(|_| SettingsError::MissingEnvVar(var_name.to_string()))?;
        result.push_str(&value);
        rest = &tail[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}
