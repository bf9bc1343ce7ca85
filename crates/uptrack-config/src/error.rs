//! Error types for endpoint configuration.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading and validating the endpoints file.
///
/// All of these are fatal: they are raised before the first cycle starts,
/// never from inside the monitoring loop.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read endpoints file: {0}")]
    Read(String),

    #[error("failed to parse endpoints file: {0}")]
    Parse(String),

    #[error("endpoint url is empty")]
    EmptyUrl,

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),

    #[error("endpoint url has no host: {0}")]
    MissingHost(String),

    #[error("unknown http method: {0}")]
    UnknownMethod(String),
}
