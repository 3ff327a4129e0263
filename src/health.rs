//! Backend health snapshots and how they are judged.

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, HealthReport};

/// Overall status value that means "all good".
pub const HEALTHY: &str = "healthy";
/// Expected backend status.
pub const BACKEND_RUNNING: &str = "running";
/// Expected status of the cache store and the model runtime.
pub const CONNECTED: &str = "connected";
/// Placeholder for fields the client could not learn.
pub const UNKNOWN: &str = "unknown";

/// Point-in-time health of the backend and its dependencies.
///
/// Always replaced wholesale, never merged with a previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Aggregate status.
    pub overall: String,
    /// Backend process.
    pub backend: String,
    /// Cache/session store.
    pub cache_store: String,
    /// Model serving runtime.
    pub model_runtime: String,
    /// Model name reported by the backend.
    pub model: String,
}

impl From<HealthReport> for HealthSnapshot {
    fn from(report: HealthReport) -> Self {
        Self {
            overall: report.status,
            backend: report.backend,
            cache_store: report.redis,
            model_runtime: report.ollama,
            model: report.model,
        }
    }
}

impl HealthSnapshot {
    /// Snapshot for "the backend is unreachable".
    pub fn disconnected() -> Self {
        Self::degraded("disconnected")
    }

    /// Snapshot for "the backend answered with an error status".
    pub fn backend_error() -> Self {
        Self::degraded("error")
    }

    fn degraded(backend: &str) -> Self {
        Self {
            overall: "error".to_string(),
            backend: backend.to_string(),
            cache_store: UNKNOWN.to_string(),
            model_runtime: UNKNOWN.to_string(),
            model: UNKNOWN.to_string(),
        }
    }

    /// Turn a health call outcome into a snapshot.
    ///
    /// Any answer with an error status counts as a backend error; everything
    /// else (refused connection, garbage body) counts as disconnected.
    pub fn from_result(result: Result<HealthReport, ApiError>) -> Self {
        match result {
            Ok(report) => report.into(),
            Err(e) if e.is_application_error() => Self::backend_error(),
            Err(_) => Self::disconnected(),
        }
    }

    /// Whether the aggregate status is healthy.
    pub fn is_healthy(&self) -> bool {
        self.overall == HEALTHY
    }

    /// Per-component verdicts, in display order.
    pub fn checks(&self) -> [ComponentCheck<'_>; 4] {
        // A model reported as "not found" is compared against the empty
        // string, so it can never pass.
        let model_expected = if self.model.contains("not found") {
            ""
        } else {
            self.model.as_str()
        };
        [
            ComponentCheck::new("Backend", &self.backend, BACKEND_RUNNING),
            ComponentCheck::new("Redis", &self.cache_store, CONNECTED),
            ComponentCheck::new("Ollama", &self.model_runtime, CONNECTED),
            ComponentCheck::new("AI Model", &self.model, model_expected),
        ]
    }
}

/// One row of the health panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentCheck<'a> {
    /// Row label.
    pub label: &'static str,
    /// Reported value.
    pub value: &'a str,
    /// Whether the value matches what a healthy system reports.
    pub ok: bool,
}

impl<'a> ComponentCheck<'a> {
    fn new(label: &'static str, value: &'a str, expected: &str) -> Self {
        Self {
            label,
            value,
            ok: value == expected,
        }
    }
}

/// Health panel state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPanel {
    /// Whether the panel is shown.
    pub open: bool,
    /// Whether a check is in flight.
    pub checking: bool,
    /// Last completed snapshot.
    pub snapshot: Option<HealthSnapshot>,
}
