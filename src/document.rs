//! Document association and the upload gate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::DocumentStatus;

/// Extensions the backend can ingest, lowercase, without the dot.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "csv", "txt"];

/// Message shown when a file fails the extension gate.
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload a PDF, CSV, or TXT file.";

/// Whether the session has a reference document on the backend.
///
/// Only the flag and the display name live here; the content stays on the
/// backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAssociation {
    /// Whether a document is attached.
    pub has_document: bool,
    /// Display name of the attached document.
    pub name: Option<String>,
}

impl DocumentAssociation {
    /// Association for a freshly uploaded file.
    pub fn attached(name: impl Into<String>) -> Self {
        Self {
            has_document: true,
            name: Some(name.into()),
        }
    }
}

impl From<DocumentStatus> for DocumentAssociation {
    fn from(status: DocumentStatus) -> Self {
        Self {
            has_document: status.has_document,
            name: status.document_name,
        }
    }
}

/// Whether `file_name` has an accepted extension (case-insensitive).
///
/// A bare dotfile such as `.pdf` has no extension and is refused.
pub fn is_allowed_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
