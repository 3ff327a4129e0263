//! `reqwest` implementation of [`ChatBackend`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;
use url::Url;

use super::ChatBackend;
use super::error::{ApiError, Result};
use super::types::{
    ChatReply, ChatRequest, DocumentStatus, ErrorBody, HealthReport, HistoryEntry,
    HistoryResponse, UploadFile,
};

/// Header carrying the session id on uploads.
const SESSION_HEADER: &str = "X-Session-ID";

/// HTTP client for the chat backend.
///
/// # Example
///
/// ```rust,no_run
/// use docchat::api::{ChatBackend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:8000")?;
/// let reply = backend.chat("Hello!", "session_1_abc").await?;
/// println!("{}", reply.response);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend (e.g., "http://localhost:8000")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Relative joins below must keep any path prefix of the base address.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn handle_empty(response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn error_from(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail_text()),
            Err(e) => {
                debug!(name: "api.error_body.unreadable", status, error = %e, "Error body unreadable");
                None
            }
        };
        ApiError::Api { status, detail }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn health(&self) -> Result<HealthReport> {
        let response = self.http.get(self.url("health")?).send().await?;
        Self::handle_response(response).await
    }

    async fn chat(&self, message: &str, session_id: &str) -> Result<ChatReply> {
        let req = ChatRequest {
            message: message.to_string(),
            session_id: session_id.to_string(),
        };
        let response = self
            .http
            .post(self.url("chat")?)
            .json(&req)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn upload(&self, session_id: &str, file: UploadFile) -> Result<()> {
        let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(mime.essence_str())?;
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.url("upload")?)
            .header(SESSION_HEADER, session_id)
            .multipart(form)
            .send()
            .await?;
        Self::handle_empty(response).await
    }

    async fn document_status(&self, session_id: &str) -> Result<DocumentStatus> {
        let response = self
            .http
            .get(self.url(&format!("document/status/{session_id}"))?)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete_document(&self, session_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("document/{session_id}"))?)
            .send()
            .await?;
        Self::handle_empty(response).await
    }

    async fn history(&self, session_id: &str) -> Result<Vec<HistoryEntry>> {
        let response = self
            .http
            .get(self.url(&format!("history/{session_id}"))?)
            .send()
            .await?;
        let history: HistoryResponse = Self::handle_response(response).await?;
        Ok(history.messages)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("session/{session_id}"))?)
            .send()
            .await?;
        Self::handle_empty(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8000/api").unwrap();
        assert_eq!(backend.base_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(
            backend.url("chat").unwrap().as_str(),
            "http://localhost:8000/api/chat"
        );
    }

    #[test]
    fn test_session_paths() {
        let backend = HttpBackend::new("http://localhost:8000").unwrap();
        assert_eq!(
            backend
                .url("document/status/session_1_abc")
                .unwrap()
                .as_str(),
            "http://localhost:8000/document/status/session_1_abc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpBackend::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
