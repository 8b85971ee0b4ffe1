//! Unified error handling for the Naver Open API client.
//!
//! Configuration-time failures and dispatch-time transport failures share one
//! type so test code can propagate everything with `?`.

use std::fmt;
use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Unified error type for client construction and dispatch.
#[derive(Debug)]
pub enum ClientError {
    /// Environment selector did not match any known environment.
    InvalidEnvironment { value: String, valid: Vec<&'static str> },
    /// Settings resource does not exist under the resource root.
    ConfigNotFound(PathBuf),
    /// Settings resource exists but could not be read or parsed.
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A required key is absent or blank.
    MissingRequiredConfig(String),
    /// A key is present but its value has the wrong shape.
    ConfigParse {
        key: String,
        value: String,
        reason: String,
    },
    /// Final validation of the assembled configuration failed.
    InvalidClientConfig(&'static str),
    /// A caller-supplied header name or value is not valid on the wire.
    InvalidHeader(String),
    /// Network-level failure: connect, timeout, or body read.
    Transport(reqwest::Error),
    /// Request body could not be encoded, or a response body could not be
    /// decoded into the requested shape.
    Json(serde_json::Error),
    /// Suite expected to run against a different environment.
    EnvironmentMismatch { expected: String, actual: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnvironment { value, valid } => write!(
                f,
                "Invalid environment: '{}'. Valid values are: {}",
                value,
                valid.join(", ")
            ),
            Self::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            Self::ConfigLoad { path, source } => {
                write!(f, "Failed to load configuration {}: {}", path.display(), source)
            }
            Self::MissingRequiredConfig(key) => write!(f, "Required property not found: {}", key),
            Self::ConfigParse { key, value, reason } => {
                write!(f, "Invalid value '{}' for {}: {}", value, key, reason)
            }
            Self::InvalidClientConfig(field) => write!(f, "{} is required", field),
            Self::InvalidHeader(msg) => write!(f, "Invalid header: {}", msg),
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::EnvironmentMismatch { expected, actual } => write!(
                f,
                "Expected environment: {}, but got: {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigLoad { source, .. } => Some(&**source),
            Self::Transport(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl ClientError {
    /// Short machine-readable category, attached as the `kind` field when
    /// a failure is logged.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEnvironment { .. } => "invalid_environment",
            Self::ConfigNotFound(_) => "config_not_found",
            Self::ConfigLoad { .. } => "config_load",
            Self::MissingRequiredConfig(_) => "missing_required_config",
            Self::ConfigParse { .. } => "config_parse",
            Self::InvalidClientConfig(_) => "invalid_client_config",
            Self::InvalidHeader(_) => "invalid_header",
            Self::Transport(_) => "transport",
            Self::Json(_) => "json",
            Self::EnvironmentMismatch { .. } => "environment_mismatch",
        }
    }

    /// True for errors raised while building a client rather than dispatching.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEnvironment { .. }
                | Self::ConfigNotFound(_)
                | Self::ConfigLoad { .. }
                | Self::MissingRequiredConfig(_)
                | Self::ConfigParse { .. }
                | Self::InvalidClientConfig(_)
        )
    }
}
