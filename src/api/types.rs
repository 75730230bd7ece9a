//! Wire types for the document chat backend.
//!
//! These mirror the JSON bodies of `POST /upload-pdf/` and `POST /chat/`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Upload API Types
// =============================================================================

/// Response from a successful PDF upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// The file name the backend stored the document under.
    pub filename: String,
    /// Optional processing status text.
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned with a non-success status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Either a plain message or a structured validation report.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Flatten the detail into display text.
    ///
    /// Strings are used verbatim, other JSON values are rendered compactly.
    #[must_use]
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

// =============================================================================
// Chat API Types
// =============================================================================

/// Request to ask a question about the loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// The question text. Empty when accepting a follow-up.
    pub question: String,
    /// Whether `followup_text` carries an accepted suggestion.
    pub use_followup: bool,
    /// The accepted follow-up suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup_text: Option<String>,
}

impl ChatRequest {
    /// A plain question typed by the user.
    pub fn question(text: impl Into<String>) -> Self {
        Self {
            question: text.into(),
            use_followup: false,
            followup_text: None,
        }
    }

    /// Accept a follow-up the backend suggested earlier.
    pub fn followup(text: impl Into<String>) -> Self {
        Self {
            question: String::new(),
            use_followup: true,
            followup_text: Some(text.into()),
        }
    }
}

/// Response to a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    /// The answer text.
    pub answer: String,
    /// A suggested next question, if any.
    #[serde(default)]
    pub followup: Option<String>,
}

impl ChatResponse {
    /// The follow-up suggestion, treating an empty string as absent.
    #[must_use]
    pub fn suggested_followup(&self) -> Option<&str> {
        self.followup.as_deref().filter(|s| !s.is_empty())
    }
}
