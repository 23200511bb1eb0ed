//! Trait definitions for the dispatch module.

use async_trait::async_trait;

use super::error::DispatchError;
use super::types::{DispatchAck, DispatchPayload};

/// Posts a payload to the downstream consumer and classifies the
/// HTTP result.
///
/// One attempt per job, no automatic retry: downstream automation is
/// expected to be an idempotent receiver, or the trigger origin is
/// informed and retries manually.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, payload: &DispatchPayload) -> Result<DispatchAck, DispatchError>;
}
