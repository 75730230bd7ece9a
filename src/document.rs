//! Documents selected for upload.

use std::path::Path;

use crate::error::Result;

/// MIME type assumed when the extension says nothing useful.
const DEFAULT_MIME: &str = "application/pdf";

/// A file chosen by the user, loaded into memory and ready to send.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadDocument {
    /// File name sent with the multipart part.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type of the part.
    pub mime_type: String,
}

impl std::fmt::Debug for UploadDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadDocument")
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl UploadDocument {
    /// Build a document from in-memory bytes.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime_type = guess_mime(&file_name);
        Self {
            file_name,
            bytes: bytes.into(),
            mime_type,
        }
    }

    /// Read a document from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "document.pdf".to_string(), |n| n.to_string_lossy().into_owned());

        tracing::debug!(
            path = %path.display(),
            size = bytes.len(),
            "Loaded document from disk"
        );

        Ok(Self::new(file_name, bytes))
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn guess_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .map_or_else(|| DEFAULT_MIME.to_string(), |m| m.essence_str().to_string())
}
