//! Error types for backend calls.

use thiserror::Error;

/// Generic message shown when the backend cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str =
    "Failed to connect to the server. Make sure the backend is running.";

/// Backend call error.
///
/// Keeps "the server answered with an error" ([`ApiError::Api`]) apart from
/// "the server could not be reached or answered garbage" (everything else).
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request never completed (connection refused, DNS, reset).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Backend returned a non-success status.
    #[error("API error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, when present.
        detail: Option<String>,
    },
}

impl ApiError {
    /// Whether the backend answered (as opposed to being unreachable).
    pub fn is_application_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Text to show the user for this failure.
    ///
    /// Application errors surface the backend detail verbatim, falling back to
    /// `fallback` when the body had none. Transport and decode failures share
    /// the generic connectivity message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Api { detail: None, .. } => fallback.to_string(),
            Self::Transport(_) | Self::InvalidUrl(_) | Self::Decode(_) => {
                UNREACHABLE_MESSAGE.to_string()
            }
        }
    }
}

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_surfaced_verbatim() {
        let err = ApiError::Api {
            status: 400,
            detail: Some("Only PDF, CSV, and TXT files are supported".into()),
        };
        assert!(err.is_application_error());
        assert_eq!(
            err.user_message("Upload failed"),
            "Only PDF, CSV, and TXT files are supported"
        );
    }

    #[test]
    fn test_missing_detail_uses_fallback() {
        let err = ApiError::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message("Upload failed"), "Upload failed");
    }

    #[test]
    fn test_decode_failure_reads_as_unreachable() {
        let err = ApiError::from(serde_json::from_str::<u8>("nope").unwrap_err());
        assert!(!err.is_application_error());
        assert_eq!(err.user_message("Upload failed"), UNREACHABLE_MESSAGE);
    }
}
