//! Trait definitions for the relay module.

use async_trait::async_trait;

use crate::retriever::RetrievedArtifact;

use super::error::UploadError;
use super::types::{BackendKind, PublicLink};

/// One ephemeral public-file-hosting backend.
///
/// Adapters validate the response shape before accepting it as a link:
/// an HTTP 200 with an unexpected body is a failure, not a success.
/// This guards against a backend silently changing its contract.
#[async_trait]
pub trait RelayBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Uploads the artifact and returns its public URL.
    async fn upload(&self, artifact: &RetrievedArtifact) -> Result<PublicLink, UploadError>;
}
