//! Mock dispatch notifier for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::dispatch::{DispatchAck, DispatchError, DispatchPayload, Notifier};

#[derive(Debug, Clone)]
enum Behavior {
    Ack(u16),
    Reject(u16),
    Unreachable,
}

/// Mock implementation of the [`Notifier`] trait that records every
/// payload it is asked to deliver.
#[derive(Clone)]
pub struct MockNotifier {
    behavior: Arc<RwLock<Behavior>>,
    payloads: Arc<RwLock<Vec<DispatchPayload>>>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// A notifier that acknowledges everything with HTTP 200.
    pub fn new() -> Self {
        Self {
            behavior: Arc::new(RwLock::new(Behavior::Ack(200))),
            payloads: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn reject_with_status(&self, status: u16) {
        *self.behavior.write().await = Behavior::Reject(status);
    }

    pub async fn unreachable(&self) {
        *self.behavior.write().await = Behavior::Unreachable;
    }

    /// Payloads received, in delivery order (including rejected ones).
    pub async fn payloads(&self) -> Vec<DispatchPayload> {
        self.payloads.read().await.clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, payload: &DispatchPayload) -> Result<DispatchAck, DispatchError> {
        self.payloads.write().await.push(payload.clone());

        let behavior = self.behavior.read().await.clone();
        match behavior {
            Behavior::Ack(status) => Ok(DispatchAck { status }),
            Behavior::Reject(status) => Err(DispatchError::Rejected {
                status,
                body: "scripted rejection".to_string(),
            }),
            Behavior::Unreachable => {
                Err(DispatchError::Unreachable("scripted network failure".to_string()))
            }
        }
    }
}
