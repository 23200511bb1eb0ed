//! Error types for the dispatch module.

use thiserror::Error;

/// Errors from the single dispatch attempt.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The webhook answered with a status >= 400.
    #[error("webhook rejected dispatch with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Transport-level failure (including the request timeout).
    #[error("webhook unreachable: {0}")]
    Unreachable(String),
}
