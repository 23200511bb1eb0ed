//! Instagram-specific retrieval via the `instaloader` CLI.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::locator::{self, LocatorConfig};

use super::config::RetrieverConfig;
use super::error::{LocateError, RetrieveError};
use super::process::run_tool;
use super::traits::Retriever;
use super::types::{Credential, RetrievalJob, RetrievedArtifact};

const TOOL: &str = "instaloader";

/// Retrieval strategy wrapping the instaloader CLI.
///
/// Instructs the tool to write directly into the job's working
/// directory with the correlation id as the file name, so the produced
/// artifact is `<correlationId>.mp4` when the tool honors the pattern
/// (versions vary; the locator handles the rest).
pub struct InstaloaderRetriever {
    bin: String,
    timeout: Duration,
    locator: LocatorConfig,
}

impl InstaloaderRetriever {
    pub fn new(config: &RetrieverConfig, locator: &LocatorConfig) -> Self {
        Self {
            bin: config.instaloader_bin.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            locator: locator.clone(),
        }
    }

    fn build_args(&self, job: &RetrievalJob) -> Vec<String> {
        let mut args = vec![
            "--no-captions".to_string(),
            "--no-compress-json".to_string(),
            "--no-metadata-json".to_string(),
            "--dirname-pattern".to_string(),
            job.work_dir.to_string_lossy().to_string(),
            "--filename-pattern".to_string(),
            job.correlation_id.clone(),
        ];

        match &job.credential {
            Some(Credential::SessionToken { session_token }) => {
                args.push("--sessionid".to_string());
                args.push(session_token.clone());
            }
            Some(other) => {
                // instaloader has no raw-cookie input; degrade to an
                // anonymous attempt rather than failing the job.
                warn!(
                    credential_kind = other.kind(),
                    "credential kind not supported by instaloader, retrieving unauthenticated"
                );
            }
            None => {}
        }

        // Explicit target separator so URLs are never parsed as flags.
        args.push("--".to_string());
        args.push(job.source_url.to_string());
        args
    }
}

#[async_trait]
impl Retriever for InstaloaderRetriever {
    fn id(&self) -> &'static str {
        TOOL
    }

    async fn retrieve(&self, job: &RetrievalJob) -> Result<RetrievedArtifact, RetrieveError> {
        tokio::fs::create_dir_all(&job.work_dir).await?;

        let args = self.build_args(job);
        let output = run_tool(&self.bin, &args, self.timeout).await?;

        // Success is defined by the artifact, not the exit status.
        let locate_result =
            locator::locate(&job.work_dir, &job.correlation_id, &self.locator).await;

        match locate_result {
            Ok(artifact) => {
                debug!(
                    correlation_id = %job.correlation_id,
                    path = %artifact.path().display(),
                    size_bytes = artifact.size_bytes(),
                    "instaloader produced artifact"
                );
                Ok(artifact)
            }
            Err(LocateError::NoArtifactFound { .. }) => match output {
                Some(out) if out.success => Err(RetrieveError::NoArtifactFound {
                    correlation_id: job.correlation_id.clone(),
                }),
                Some(out) => Err(RetrieveError::ProcessFailure {
                    tool: TOOL.to_string(),
                    detail: out.diagnostic_tail(),
                }),
                None => Err(RetrieveError::ProcessFailure {
                    tool: TOOL.to_string(),
                    detail: format!("timed out after {}s", self.timeout.as_secs()),
                }),
            },
            Err(LocateError::Io(e)) => Err(e.into()),
        }
    }
}
