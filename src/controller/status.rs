//! Upload status banner state.

/// What the upload banner currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadStatus {
    /// No upload attempted yet.
    #[default]
    Hidden,
    InProgress(String),
    Success(String),
    Error(String),
}

impl UploadStatus {
    /// Banner text, if the banner is visible.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Hidden => None,
            Self::InProgress(t) | Self::Success(t) | Self::Error(t) => Some(t),
        }
    }

    /// The visual state class for the banner.
    #[must_use]
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Self::Hidden => None,
            Self::InProgress(_) => Some("alert-info"),
            Self::Success(_) => Some("alert-success"),
            Self::Error(_) => Some("alert-danger"),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
