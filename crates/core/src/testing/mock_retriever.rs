//! Mock retriever for testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::retriever::{RetrievalJob, RetrieveError, RetrievedArtifact, Retriever};

/// Scripted failure kinds for the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Process,
    NoArtifact,
    InvalidInput,
}

#[derive(Debug, Clone)]
enum MockOutcome {
    Succeed { size_bytes: usize },
    Fail(MockFailure),
}

/// Mock implementation of the [`Retriever`] trait.
///
/// Outcomes are scripted in FIFO order with `push_success` /
/// `push_failure`; with an empty script every call succeeds with a
/// 1 KiB artifact. Successful calls write a real `<correlationId>.mp4`
/// into the job's working directory, so locator and cleanup behavior
/// stay observable. Each call records which credential kind (if any)
/// was attached to the job.
#[derive(Clone, Default)]
pub struct MockRetriever {
    script: Arc<RwLock<VecDeque<MockOutcome>>>,
    attempts: Arc<RwLock<Vec<Option<String>>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful outcome producing a 1 KiB artifact.
    pub async fn push_success(&self) {
        self.push_success_with_size(1024).await;
    }

    /// Queue a successful outcome producing an artifact of the given size.
    pub async fn push_success_with_size(&self, size_bytes: usize) {
        self.script
            .write()
            .await
            .push_back(MockOutcome::Succeed { size_bytes });
    }

    /// Queue a scripted failure.
    pub async fn push_failure(&self, failure: MockFailure) {
        self.script
            .write()
            .await
            .push_back(MockOutcome::Fail(failure));
    }

    /// Delay applied to every call, for deadline tests.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Credential kinds recorded per attempt, in call order.
    pub async fn attempts(&self) -> Vec<Option<String>> {
        self.attempts.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.attempts.read().await.len()
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn retrieve(&self, job: &RetrievalJob) -> Result<RetrievedArtifact, RetrieveError> {
        self.attempts
            .write()
            .await
            .push(job.credential.as_ref().map(|c| c.kind().to_string()));

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .script
            .write()
            .await
            .pop_front()
            .unwrap_or(MockOutcome::Succeed { size_bytes: 1024 });

        match outcome {
            MockOutcome::Succeed { size_bytes } => {
                tokio::fs::create_dir_all(&job.work_dir).await?;
                let path = job.work_dir.join(format!("{}.mp4", job.correlation_id));
                tokio::fs::write(&path, vec![0u8; size_bytes]).await?;
                Ok(RetrievedArtifact::try_from_path(&path)
                    .await
                    .expect("mock artifact must satisfy the non-empty invariant"))
            }
            MockOutcome::Fail(MockFailure::Process) => Err(RetrieveError::ProcessFailure {
                tool: "mock".to_string(),
                detail: "scripted failure".to_string(),
            }),
            MockOutcome::Fail(MockFailure::NoArtifact) => Err(RetrieveError::NoArtifactFound {
                correlation_id: job.correlation_id.clone(),
            }),
            MockOutcome::Fail(MockFailure::InvalidInput) => {
                Err(RetrieveError::InvalidInput("scripted failure".to_string()))
            }
        }
    }
}
