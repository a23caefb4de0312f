//! Error types returned by the search, download, and report operations.
//!
//! None of these are retried. The front end decides how to show them.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of the single search request for one book.
#[derive(Debug, Error)]
pub enum SearchError {
    /// DNS, connect, TLS, or body read failure.
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The search endpoint answered with a non-success status.
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },
}

/// Failure of one download in a batch.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("network error downloading {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} downloading {url}")]
    HttpStatus { url: String, status: u16 },

    /// Creating the book folder or writing the file failed.
    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Writing the results report failed.
#[derive(Debug, Error)]
#[error("failed to write results to {path}: {source}")]
pub struct ReportError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Invalid configuration file or override.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid search endpoint {endpoint}: {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("max_results must be at least 1")]
    MaxResults,

    #[error("timeout must be a finite number of seconds, zero or more (got {0})")]
    Timeout(f64),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
