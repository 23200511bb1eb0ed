//! Error types for the relay module.

use thiserror::Error;

use super::types::BackendKind;

/// Errors from one backend upload attempt.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Non-2xx HTTP response.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 2xx response whose body does not match the backend's documented
    /// success shape. Treated as failure, not success.
    #[error("unexpected response shape: {0}")]
    BadResponse(String),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The backend's per-attempt timeout expired.
    #[error("upload timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Failed to read the artifact from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One backend's recorded failure, kept for diagnostics when the whole
/// chain fails.
#[derive(Debug, Clone)]
pub struct BackendFailure {
    pub backend: BackendKind,
    pub error: String,
}

/// Terminal failure of the uploader chain.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Every configured backend failed; one record per backend.
    #[error("all relay backends failed: {}", format_failures(failures))]
    AllBackendsFailed { failures: Vec<BackendFailure> },
}

fn format_failures(failures: &[BackendFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.backend, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}
