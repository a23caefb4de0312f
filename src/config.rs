use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::ConfigError;
use crate::extract::MAX_RESULTS;

pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Settings shared by every search and download in a session.
///
/// Read from an optional TOML file; missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTML search endpoint receiving the `q` form field.
    pub endpoint: String,
    /// User-Agent header sent with the search request.
    pub user_agent: String,
    /// Results kept per book.
    pub max_results: usize,
    /// Folder under which one directory per book is created.
    pub output_dir: PathBuf,
    /// Request timeout in seconds. Unset means requests may block forever.
    pub timeout_secs: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_results: MAX_RESULTS,
            output_dir: PathBuf::from("."),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        if self.max_results == 0 {
            return Err(ConfigError::MaxResults);
        }
        self.timeout()?;
        Ok(())
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.endpoint).map_err(|source| ConfigError::Endpoint {
            endpoint: self.endpoint.clone(),
            source,
        })
    }

    /// Request timeout; zero means none. Negative, NaN, infinite, or
    /// out-of-range values are rejected.
    pub fn timeout(&self) -> Result<Option<Duration>, ConfigError> {
        match self.timeout_secs {
            None => Ok(None),
            Some(secs) if secs == 0.0 => Ok(None),
            Some(secs) if secs < 0.0 => Err(ConfigError::Timeout(secs)),
            Some(secs) => Duration::try_from_secs_f64(secs)
                .map(Some)
                .map_err(|_| ConfigError::Timeout(secs)),
        }
    }
}
