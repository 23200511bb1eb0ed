//! Relay orchestrator implementation.
//!
//! Drives one job through the state machine:
//! `Retrieving -> Locating -> Uploading -> Dispatching -> Done`, with
//! `Failed(kind)` reachable from any non-terminal state. The job's
//! working directory is removed on every exit path, including deadline
//! expiry.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::dispatch::{DispatchPayload, Notifier, WebhookNotifier};
use crate::locator::{self, LocatorConfig};
use crate::relay::{self, UploaderChain};
use crate::retriever::{self, AuthenticatedRetriever, RetrievalJob, RetrieveError, RetrievedArtifact};
use crate::trigger::TriggerRequest;

use super::config::OrchestratorConfig;
use super::types::{JobError, JobReceipt, JobState, ProgressSink};

/// The relay orchestrator - runs one pipeline per triggered job.
///
/// Jobs share no mutable state and may run concurrently up to
/// `max_concurrent_jobs`; within a job every step is strictly
/// sequential because each depends on its predecessor's output.
pub struct RelayOrchestrator {
    config: OrchestratorConfig,
    allowed_domains: Vec<String>,
    locator_config: LocatorConfig,
    source_tag: String,
    retrievers: Vec<AuthenticatedRetriever>,
    chain: UploaderChain,
    notifier: Arc<dyn Notifier>,
    limiter: Option<Arc<Semaphore>>,
}

impl RelayOrchestrator {
    /// Create an orchestrator from explicit components. Used by tests
    /// with mock retrievers, backends and notifiers.
    pub fn new(
        config: OrchestratorConfig,
        allowed_domains: Vec<String>,
        locator_config: LocatorConfig,
        source_tag: String,
        retrievers: Vec<AuthenticatedRetriever>,
        chain: UploaderChain,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let limiter = match config.max_concurrent_jobs {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };
        Self {
            config,
            allowed_domains,
            locator_config,
            source_tag,
            retrievers,
            chain,
            notifier,
            limiter,
        }
    }

    /// Create an orchestrator with the real strategies, backends and
    /// webhook notifier from a validated configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.orchestrator.clone(),
            config.trigger.allowed_domains.clone(),
            config.locator.clone(),
            config.dispatch.source_tag.clone(),
            retriever::create_strategies(&config.retriever, &config.locator),
            relay::create_chain(&config.relay),
            Arc::new(WebhookNotifier::new(&config.dispatch)),
        )
    }

    /// Runs one job to a terminal state and reports the outcome.
    ///
    /// The per-job working directory is deleted before this returns,
    /// whatever happened; a cleanup error is logged but never replaces
    /// the job's own result.
    pub async fn run_job(
        &self,
        trigger: TriggerRequest,
        progress: &dyn ProgressSink,
    ) -> Result<JobReceipt, JobError> {
        let correlation_id = Uuid::new_v4().to_string();

        // Reject before allocating anything, but still report the
        // terminal state so the trigger origin sees a status line.
        let source_url = match trigger.validate(&self.allowed_domains) {
            Ok(url) => url,
            Err(e) => {
                let err = JobError::InvalidInput(e);
                error!(correlation_id = %correlation_id, "relay job failed: {err}");
                progress.report(&correlation_id, &JobState::Failed(err.kind()), &err.to_string());
                return Err(err);
            }
        };

        let _permit = match &self.limiter {
            Some(sem) => Arc::clone(sem).acquire_owned().await.ok(),
            None => None,
        };

        let work_dir = self.config.temp_root.join(&correlation_id);
        let job = RetrievalJob {
            correlation_id: correlation_id.clone(),
            source_url,
            work_dir: work_dir.clone(),
            credential: None,
        };

        info!(
            correlation_id = %correlation_id,
            url = %job.source_url,
            "starting relay job"
        );

        let deadline = Duration::from_secs(self.config.job_deadline_secs);
        let result =
            match tokio::time::timeout(deadline, self.execute(&job, &trigger, progress)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(correlation_id = %correlation_id, "job deadline exceeded, abandoning");
                    Err(JobError::Timeout {
                        deadline_secs: self.config.job_deadline_secs,
                    })
                }
            };

        cleanup_work_dir(&work_dir, &correlation_id).await;

        match &result {
            Ok(receipt) => {
                info!(
                    correlation_id = %correlation_id,
                    url = %receipt.public_link.url,
                    "relay job done"
                );
                progress.report(&correlation_id, &JobState::Done, &receipt.public_link.url);
            }
            Err(e) => {
                error!(correlation_id = %correlation_id, "relay job failed: {e}");
                progress.report(&correlation_id, &JobState::Failed(e.kind()), &e.to_string());
            }
        }

        result
    }

    async fn execute(
        &self,
        job: &RetrievalJob,
        trigger: &TriggerRequest,
        progress: &dyn ProgressSink,
    ) -> Result<JobReceipt, JobError> {
        progress.report(
            &job.correlation_id,
            &JobState::Retrieving,
            trigger.source_url.trim(),
        );
        let artifact = self.retrieve(job).await?;

        progress.report(&job.correlation_id, &JobState::Locating, "");
        let artifact = self.finalize(job, artifact).await;

        progress.report(&job.correlation_id, &JobState::Uploading, "");
        let public_link = self.chain.upload(&artifact).await?;

        progress.report(&job.correlation_id, &JobState::Dispatching, &public_link.url);
        let payload = DispatchPayload::new(
            &trigger.caption,
            trigger.source_url.trim(),
            &public_link.url,
            &self.source_tag,
        );
        match self.notifier.notify(&payload).await {
            Ok(ack) => {
                debug!(correlation_id = %job.correlation_id, status = ack.status, "dispatch acknowledged");
                Ok(JobReceipt {
                    correlation_id: job.correlation_id.clone(),
                    public_link,
                    dispatched_at: Utc::now(),
                })
            }
            // Keep the link: the upload succeeded and the trigger
            // origin should still get it, even though the job failed.
            Err(error) => Err(JobError::Dispatch { error, public_link }),
        }
    }

    /// Tries the configured strategies in order. Each strategy already
    /// carries its own credential fallback; there is no retry beyond
    /// the strategy list itself.
    async fn retrieve(&self, job: &RetrievalJob) -> Result<RetrievedArtifact, JobError> {
        let mut last: Option<RetrieveError> = None;

        for strategy in &self.retrievers {
            debug!(
                correlation_id = %job.correlation_id,
                strategy = strategy.id(),
                "trying retrieval strategy"
            );
            match strategy.retrieve(job).await {
                Ok(artifact) => return Ok(artifact),
                Err(e) => {
                    warn!(
                        correlation_id = %job.correlation_id,
                        strategy = strategy.id(),
                        "strategy failed: {e}"
                    );
                    last = Some(e);
                }
            }
        }

        Err(match last {
            Some(e) => JobError::Retrieve(e),
            // Unreachable with a validated config; kept total anyway.
            None => JobError::Retrieve(RetrieveError::NoArtifactFound {
                correlation_id: job.correlation_id.clone(),
            }),
        })
    }

    /// Resolves the final playable artifact (remuxing an audio sidecar
    /// when one is present).
    async fn finalize(&self, job: &RetrievalJob, artifact: RetrievedArtifact) -> RetrievedArtifact {
        locator::finalize(
            artifact,
            &job.work_dir,
            &job.correlation_id,
            &self.locator_config,
        )
        .await
    }
}

/// Scoped-resource guarantee: the working directory never outlives the
/// job, and a cleanup failure never masks the job's outcome.
async fn cleanup_work_dir(work_dir: &Path, correlation_id: &str) {
    match tokio::fs::remove_dir_all(work_dir).await {
        Ok(()) => debug!(correlation_id, "removed working directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            correlation_id,
            path = %work_dir.display(),
            "failed to remove working directory: {e}"
        ),
    }
}
