//! Error types for the client.

use thiserror::Error;

/// Client error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (connection failure, malformed
    /// request, timeout).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured API root is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A request was issued before the API root was configured.
    #[error("API url is not set")]
    MissingApiUrl,

    /// Session snapshot could not be stored or restored.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A notification was dispatched under a name nobody handles.
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// A plugin descriptor does not match the shape its plugin expects.
    #[error("Plugin '{plugin}' configuration error: {message}")]
    Plugin {
        /// Descriptor name.
        plugin: String,
        /// What did not match.
        message: String,
    },
}

impl Error {
    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
