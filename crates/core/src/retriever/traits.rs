//! Trait definitions for the retriever module.

use async_trait::async_trait;

use super::error::RetrieveError;
use super::types::{RetrievalJob, RetrievedArtifact};

/// One pluggable mechanism for turning a source URL into a local
/// media file.
///
/// A strategy invokes its extraction tool with an output path template
/// keyed by the job's correlation id, then establishes success purely
/// from the presence of a non-empty artifact in the working directory.
/// The tool's exit code is advisory: some extractors exit 0 while
/// writing partial output, and some produce a file despite a non-zero
/// exit.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Stable identifier for logs and failure messages.
    fn id(&self) -> &'static str;

    /// Retrieves the job's source URL into its working directory.
    ///
    /// Writes files under `job.work_dir` but never deletes anything;
    /// cleanup is the orchestrator's responsibility.
    async fn retrieve(&self, job: &RetrievalJob) -> Result<RetrievedArtifact, RetrieveError>;
}
