//! Error types for the client.

use thiserror::Error;

/// Client error type.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a local file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend answered with a non-success status.
    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or(UNKNOWN_ERROR))]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `detail` field of the error body, if there was one.
        detail: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Shown when the backend rejects a request without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

impl Error {
    /// Text suitable for showing to the user.
    ///
    /// Server rejections surface only their detail; everything else uses
    /// the full error text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { detail, .. } => detail.as_deref().unwrap_or(UNKNOWN_ERROR).to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the backend itself rejected the request.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
