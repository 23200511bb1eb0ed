//! Types for the relay orchestrator.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::relay::{PublicLink, RelayError};
use crate::retriever::RetrieveError;
use crate::trigger::TriggerError;

/// Errors that end a job. The originating component failure is
/// preserved verbatim for reporting.
#[derive(Debug, Error)]
pub enum JobError {
    /// Trigger rejected before any retrieval work.
    #[error("rejected: {0}")]
    InvalidInput(#[from] TriggerError),

    /// Every retrieval strategy failed; carries the last one's error.
    #[error(transparent)]
    Retrieve(#[from] RetrieveError),

    /// Every relay backend failed.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The webhook attempt failed after a successful upload. The
    /// public link is kept so the trigger origin still receives it.
    #[error("{error} (video is hosted at {public_link})")]
    Dispatch {
        error: DispatchError,
        public_link: PublicLink,
    },

    /// The overall job deadline expired.
    #[error("job exceeded its deadline of {deadline_secs}s")]
    Timeout { deadline_secs: u64 },
}

impl JobError {
    /// Classification for user-facing failure messages.
    pub fn kind(&self) -> FailureKind {
        match self {
            JobError::InvalidInput(_) => FailureKind::InvalidInput,
            JobError::Retrieve(e) => match e {
                RetrieveError::InvalidInput(_) => FailureKind::InvalidInput,
                RetrieveError::NoArtifactFound { .. } => FailureKind::NoArtifactFound,
                RetrieveError::AuthExhausted { .. } => FailureKind::AuthExhausted,
                RetrieveError::ProcessFailure { .. } | RetrieveError::Io(_) => {
                    FailureKind::ProcessFailure
                }
            },
            JobError::Relay(RelayError::AllBackendsFailed { .. }) => {
                FailureKind::AllBackendsFailed
            }
            JobError::Dispatch { error, .. } => match error {
                DispatchError::Rejected { .. } => FailureKind::DispatchRejected,
                DispatchError::Unreachable(_) => FailureKind::DispatchUnreachable,
            },
            JobError::Timeout { .. } => FailureKind::Timeout,
        }
    }
}

/// The failure taxonomy surfaced to the trigger origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    ProcessFailure,
    NoArtifactFound,
    AuthExhausted,
    AllBackendsFailed,
    DispatchRejected,
    DispatchUnreachable,
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::InvalidInput => "invalid input",
            FailureKind::ProcessFailure => "process failure",
            FailureKind::NoArtifactFound => "no artifact found",
            FailureKind::AuthExhausted => "authentication exhausted",
            FailureKind::AllBackendsFailed => "all backends failed",
            FailureKind::DispatchRejected => "dispatch rejected",
            FailureKind::DispatchUnreachable => "dispatch unreachable",
            FailureKind::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// State machine for one job. Transitions are strictly sequential;
/// any non-terminal state can fail directly into `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Retrieving,
    Locating,
    Uploading,
    Dispatching,
    Done,
    Failed(FailureKind),
}

impl JobState {
    /// Human-readable status line for the trigger origin.
    pub fn message(&self) -> String {
        match self {
            JobState::Retrieving => "downloading source video".to_string(),
            JobState::Locating => "checking downloaded file".to_string(),
            JobState::Uploading => "publishing to a public host".to_string(),
            JobState::Dispatching => "notifying downstream automation".to_string(),
            JobState::Done => "done".to_string(),
            JobState::Failed(kind) => format!("failed: {kind}"),
        }
    }
}

/// Receives one status line per state transition. Observable side
/// effect only; not part of the correctness contract.
pub trait ProgressSink: Send + Sync {
    fn report(&self, correlation_id: &str, state: &JobState, detail: &str);
}

/// Progress sink that only emits tracing events.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, correlation_id: &str, state: &JobState, detail: &str) {
        tracing::info!(correlation_id, state = %state.message(), detail, "job progress");
    }
}

/// Successful outcome of one relay job.
#[derive(Debug, Clone)]
pub struct JobReceipt {
    pub correlation_id: String,
    pub public_link: PublicLink,
    pub dispatched_at: DateTime<Utc>,
}
