//! Wire types for the chat backend.
//!
//! These mirror the backend's JSON bodies one to one; conversion into
//! controller-side types happens in the controller.

use serde::{Deserialize, Serialize};

// =============================================================================
// Chat
// =============================================================================

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's message, already trimmed.
    pub message: String,
    /// Session the message belongs to.
    pub session_id: String,
}

/// Successful `POST /chat` reply. The whole answer arrives at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// Complete assistant answer.
    pub response: String,
}

/// Error body returned by the backend on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Human readable failure reason.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Flatten `detail` into display text.
    ///
    /// Validation failures sometimes carry a structured detail instead of a
    /// string; those are rendered as compact JSON.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

// =============================================================================
// Documents
// =============================================================================

/// Reply of `GET /document/status/{session_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DocumentStatus {
    /// Whether the session has an uploaded reference document.
    pub has_document: bool,
    /// Display name of that document.
    #[serde(default)]
    pub document_name: Option<String>,
}

/// A file ready to be sent to `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as shown to the user; also used for the multipart part name.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create an upload payload.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// One stored turn from `GET /history/{session_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Reply of `GET /history/{session_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HistoryResponse {
    /// Stored turns, oldest first.
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

// =============================================================================
// Health
// =============================================================================

/// Reply of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    /// Overall status, `healthy` when everything is fine.
    pub status: String,
    /// Backend process status.
    pub backend: String,
    /// Cache/session store status.
    pub redis: String,
    /// Model runtime status.
    pub ollama: String,
    /// Configured model name, or a "not found" marker.
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"No document"}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("No document"));
    }

    #[test]
    fn test_error_body_structured_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","message"]}]}"#).unwrap();
        assert_eq!(
            body.detail_text().as_deref(),
            Some(r#"[{"loc":["body","message"]}]"#)
        );
    }

    #[test]
    fn test_error_body_without_detail() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.detail_text().is_none());
    }

    #[test]
    fn test_document_status_null_name() {
        let status: DocumentStatus =
            serde_json::from_str(r#"{"has_document":false,"document_name":null}"#).unwrap();
        assert_eq!(status, DocumentStatus::default());
    }
}
