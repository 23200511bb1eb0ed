//! Mock relay backend for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::relay::{BackendKind, PublicLink, RelayBackend, UploadError};
use crate::retriever::RetrievedArtifact;

#[derive(Debug, Clone)]
enum Behavior {
    Succeed(String),
    FailHttp(u16),
    FailNetwork,
    FailBadResponse,
}

/// Mock implementation of the [`RelayBackend`] trait with a fixed
/// behavior per instance and an upload call counter.
#[derive(Clone)]
pub struct MockBackend {
    kind: BackendKind,
    behavior: Arc<RwLock<Behavior>>,
    calls: Arc<AtomicUsize>,
    uploaded_sizes: Arc<RwLock<Vec<u64>>>,
}

impl MockBackend {
    /// A backend that accepts every upload, returning a URL derived
    /// from its kind.
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            behavior: Arc::new(RwLock::new(Behavior::Succeed(format!(
                "https://{kind}.example/hosted"
            )))),
            calls: Arc::new(AtomicUsize::new(0)),
            uploaded_sizes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn succeed_with(&self, url: &str) {
        *self.behavior.write().await = Behavior::Succeed(url.to_string());
    }

    pub async fn fail_with_status(&self, status: u16) {
        *self.behavior.write().await = Behavior::FailHttp(status);
    }

    pub async fn fail_network(&self) {
        *self.behavior.write().await = Behavior::FailNetwork;
    }

    pub async fn fail_bad_response(&self) {
        *self.behavior.write().await = Behavior::FailBadResponse;
    }

    /// Number of upload attempts this backend received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Artifact sizes seen by successful and failed uploads alike.
    pub async fn uploaded_sizes(&self) -> Vec<u64> {
        self.uploaded_sizes.read().await.clone()
    }
}

#[async_trait]
impl RelayBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn upload(&self, artifact: &RetrievedArtifact) -> Result<PublicLink, UploadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded_sizes.write().await.push(artifact.size_bytes());

        let behavior = self.behavior.read().await.clone();
        match behavior {
            Behavior::Succeed(url) => Ok(PublicLink {
                url,
                backend: self.kind,
            }),
            Behavior::FailHttp(status) => Err(UploadError::Http {
                status,
                body: "scripted failure".to_string(),
            }),
            Behavior::FailNetwork => {
                Err(UploadError::Network("scripted connection refused".to_string()))
            }
            Behavior::FailBadResponse => {
                Err(UploadError::BadResponse("scripted garbage body".to_string()))
            }
        }
    }
}
