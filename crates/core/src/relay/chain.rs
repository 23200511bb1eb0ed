//! Ordered fallback chain over the relay backends.

use std::sync::Arc;

use tracing::{info, warn};

use crate::retriever::RetrievedArtifact;

use super::error::{BackendFailure, RelayError};
use super::traits::RelayBackend;
use super::types::PublicLink;

/// Tries each configured backend in order; the first success
/// short-circuits the rest, and no backend is retried.
pub struct UploaderChain {
    backends: Vec<Arc<dyn RelayBackend>>,
}

impl UploaderChain {
    pub fn new(backends: Vec<Arc<dyn RelayBackend>>) -> Self {
        Self { backends }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Uploads the artifact to the first backend that accepts it.
    ///
    /// When every backend fails, the error aggregates exactly one
    /// recorded failure per backend, in chain order.
    pub async fn upload(&self, artifact: &RetrievedArtifact) -> Result<PublicLink, RelayError> {
        let mut failures = Vec::with_capacity(self.backends.len());

        for backend in &self.backends {
            match backend.upload(artifact).await {
                Ok(link) => {
                    info!(
                        backend = %backend.kind(),
                        url = %link.url,
                        skipped_failures = failures.len(),
                        "artifact hosted"
                    );
                    return Ok(link);
                }
                Err(e) => {
                    warn!(backend = %backend.kind(), "backend failed, advancing: {e}");
                    failures.push(BackendFailure {
                        backend: backend.kind(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Err(RelayError::AllBackendsFailed { failures })
    }
}
