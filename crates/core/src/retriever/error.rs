//! Error types for the retriever module.

use thiserror::Error;

/// Errors that can occur while retrieving a source URL.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Malformed URL or unsupported input for this strategy.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The extraction tool failed and left no usable artifact behind.
    #[error("{tool} failed: {detail}")]
    ProcessFailure { tool: String, detail: String },

    /// The extraction tool exited cleanly but produced no matching file.
    #[error("no artifact produced for job {correlation_id}")]
    NoArtifactFound { correlation_id: String },

    /// Both the unauthenticated and the authenticated attempt failed.
    ///
    /// Carries the last underlying failure. The credential value itself
    /// never appears here, only its kind.
    #[error("retrieval failed even after trying the {credential_kind} credential: {last}")]
    AuthExhausted {
        credential_kind: &'static str,
        last: Box<RetrieveError>,
    },

    /// Filesystem error while preparing or inspecting the working directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetrieveError {
    /// Whether the authenticated fallback may retry after this failure.
    ///
    /// Only tool-level failures are worth a second pass with different
    /// credential material; bad input and I/O trouble are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RetrieveError::ProcessFailure { .. } | RetrieveError::NoArtifactFound { .. }
        )
    }
}

/// Errors that can occur while locating a produced artifact.
#[derive(Debug, Error)]
pub enum LocateError {
    /// No non-empty file matching the correlation id was found.
    #[error("no artifact found for job {correlation_id}")]
    NoArtifactFound { correlation_id: String },

    /// Failed to scan the working directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LocateError> for RetrieveError {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::NoArtifactFound { correlation_id } => {
                RetrieveError::NoArtifactFound { correlation_id }
            }
            LocateError::Io(e) => RetrieveError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_failures() {
        assert!(RetrieveError::ProcessFailure {
            tool: "instaloader".to_string(),
            detail: "boom".to_string(),
        }
        .is_retryable());
        assert!(RetrieveError::NoArtifactFound {
            correlation_id: "abc".to_string(),
        }
        .is_retryable());
        assert!(!RetrieveError::InvalidInput("nope".to_string()).is_retryable());
    }

    #[test]
    fn test_auth_exhausted_mentions_kind_not_value() {
        let err = RetrieveError::AuthExhausted {
            credential_kind: "session_token",
            last: Box::new(RetrieveError::NoArtifactFound {
                correlation_id: "abc".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("session_token"));
        assert!(msg.contains("abc"));
    }
}
