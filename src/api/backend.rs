//! The backend seam used by the chat controller.

use async_trait::async_trait;

use crate::api::types::{ChatRequest, ChatResponse, UploadResponse};
use crate::document::UploadDocument;
use crate::error::Result;

/// Anything that can take a PDF and answer questions about it.
///
/// [`HttpBackend`](crate::api::HttpBackend) talks to the real service;
/// tests substitute scripted implementations.
#[async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Upload a document for question answering.
    ///
    /// A non-success response must come back as
    /// [`Error::Api`](crate::Error::Api) so the caller can tell a server
    /// rejection from a transport failure.
    async fn upload_pdf(&self, document: UploadDocument) -> Result<UploadResponse>;

    /// Ask a question, or accept a previously suggested follow-up.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}
