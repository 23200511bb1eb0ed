//! Authenticated retrieval decorator.
//!
//! Wraps a [`Retriever`] and retries exactly once with (or without)
//! credential material when the first attempt fails with a tool-level
//! error. Never more than two attempts total.

use std::sync::Arc;

use tracing::{info, warn};

use super::config::AuthOrder;
use super::error::RetrieveError;
use super::traits::Retriever;
use super::types::{Credential, RetrievalJob, RetrievedArtifact};

/// Decorator adding the credential fallback to a retrieval strategy.
///
/// With no credential configured, only the unauthenticated path runs.
/// With one configured, the [`AuthOrder`] policy decides which attempt
/// leads; the second attempt only happens when the first fails with
/// `ProcessFailure` or `NoArtifactFound`. When both fail the result is
/// `AuthExhausted` carrying the last underlying failure.
pub struct AuthenticatedRetriever {
    inner: Arc<dyn Retriever>,
    credential: Option<Credential>,
    order: AuthOrder,
}

impl AuthenticatedRetriever {
    pub fn new(inner: Arc<dyn Retriever>, credential: Option<Credential>, order: AuthOrder) -> Self {
        Self {
            inner,
            credential,
            order,
        }
    }

    /// Identifier of the wrapped strategy.
    pub fn id(&self) -> &'static str {
        self.inner.id()
    }

    pub async fn retrieve(&self, job: &RetrievalJob) -> Result<RetrievedArtifact, RetrieveError> {
        let Some(credential) = &self.credential else {
            return self.inner.retrieve(&job.with_credential(None)).await;
        };

        let (first_authed, second_authed) = match self.order {
            AuthOrder::UnauthenticatedFirst => (false, true),
            AuthOrder::AuthenticatedFirst => (true, false),
        };

        let first = self.attempt(job, first_authed, credential).await;
        let first_err = match first {
            Ok(artifact) => return Ok(artifact),
            Err(e) if e.is_retryable() => e,
            Err(e) => return Err(e),
        };

        warn!(
            strategy = self.inner.id(),
            correlation_id = %job.correlation_id,
            credential_kind = credential.kind(),
            authenticated = second_authed,
            "first retrieval attempt failed, retrying: {first_err}"
        );

        match self.attempt(job, second_authed, credential).await {
            Ok(artifact) => Ok(artifact),
            Err(last) => Err(RetrieveError::AuthExhausted {
                credential_kind: credential.kind(),
                last: Box::new(last),
            }),
        }
    }

    async fn attempt(
        &self,
        job: &RetrievalJob,
        authenticated: bool,
        credential: &Credential,
    ) -> Result<RetrievedArtifact, RetrieveError> {
        info!(
            strategy = self.inner.id(),
            correlation_id = %job.correlation_id,
            authenticated,
            "retrieval attempt"
        );
        let credential = authenticated.then(|| credential.clone());
        self.inner.retrieve(&job.with_credential(credential)).await
    }
}
