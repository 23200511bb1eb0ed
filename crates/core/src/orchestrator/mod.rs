//! Relay orchestrator: sequences retrieval, locating, upload and
//! dispatch for one job, owning the correlation id and the working
//! directory for its lifetime.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::RelayOrchestrator;
pub use types::{FailureKind, JobError, JobReceipt, JobState, LogProgress, ProgressSink};
