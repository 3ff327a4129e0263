//! Backend collaborators.
//!
//! The controller never talks HTTP directly; it goes through [`ChatBackend`],
//! which [`HttpBackend`] implements with `reqwest`. Tests substitute their
//! own implementation.
//!
//! # Endpoints
//!
//! | Call            | Method/Path                         |
//! |-----------------|-------------------------------------|
//! | Health          | `GET /health`                       |
//! | Chat            | `POST /chat`                        |
//! | Upload          | `POST /upload` (multipart)          |
//! | Document status | `GET /document/status/{session_id}` |
//! | Delete document | `DELETE /document/{session_id}`     |
//! | History         | `GET /history/{session_id}`         |
//! | Delete session  | `DELETE /session/{session_id}`      |

mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::HttpBackend;
pub use error::{ApiError, Result, UNREACHABLE_MESSAGE};
pub use types::{ChatReply, DocumentStatus, HealthReport, HistoryEntry, UploadFile};

/// Everything the controller needs from the backend.
///
/// Every call takes the session id explicitly so the caller decides which
/// identifier a request is issued under.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Aggregate health of the backend and its dependencies.
    async fn health(&self) -> Result<HealthReport>;

    /// Send one message and wait for the complete reply.
    async fn chat(&self, message: &str, session_id: &str) -> Result<ChatReply>;

    /// Upload a reference document for the session.
    async fn upload(&self, session_id: &str, file: UploadFile) -> Result<()>;

    /// Whether the session currently has a document.
    async fn document_status(&self, session_id: &str) -> Result<DocumentStatus>;

    /// Remove the session's document.
    async fn delete_document(&self, session_id: &str) -> Result<()>;

    /// Stored conversation for the session, oldest first.
    async fn history(&self, session_id: &str) -> Result<Vec<HistoryEntry>>;

    /// Drop the whole backend-side session.
    async fn delete_session(&self, session_id: &str) -> Result<()>;
}
