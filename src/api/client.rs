//! HTTP backend for the document chat service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::api::backend::Backend;
use crate::api::types::{ChatRequest, ChatResponse, ErrorBody, UploadResponse};
use crate::config::BackendConfig;
use crate::document::UploadDocument;
use crate::error::{Error, Result};

/// Multipart field the backend reads the document from.
const FILE_FIELD: &str = "file";

/// HTTP client for the upload and chat endpoints.
///
/// # Example
///
/// ```rust,no_run
/// use docchat::api::{ChatRequest, HttpBackend};
/// use docchat::api::Backend;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://127.0.0.1:8080")?;
/// let answer = backend.chat(&ChatRequest::question("What is this about?")).await?;
/// println!("{}", answer.answer);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    upload_url: Url,
    chat_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend with the default endpoint paths and no timeout.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::from_config(&BackendConfig {
            base_url: base_url.as_ref().to_string(),
            ..BackendConfig::default()
        })
    }

    /// Create a backend from configuration.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let http = builder.build()?;
        Self::with_client(config, http)
    }

    /// Create a backend with a custom reqwest client.
    pub fn with_client(config: &BackendConfig, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "backend base URL must be http or https, got {base_url}"
            )));
        }
        Ok(Self {
            upload_url: base_url.join(&config.upload_path)?,
            chat_url: base_url.join(&config.chat_path)?,
            http,
        })
    }

    /// Resolved upload endpoint.
    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    /// Resolved chat endpoint.
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail_text());

        tracing::warn!(
            status = status.as_u16(),
            detail = ?detail,
            "Backend rejected request"
        );

        Err(Error::Api {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload_pdf(&self, document: UploadDocument) -> Result<UploadResponse> {
        tracing::debug!(
            url = %self.upload_url,
            file_name = %document.file_name,
            size = document.len(),
            "Uploading document"
        );

        let part = Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str(&document.mime_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .http
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            url = %self.chat_url,
            use_followup = request.use_followup,
            "Sending chat request"
        );

        let response = self
            .http
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}
