//! HTTP webhook notifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::error::DispatchError;
use super::traits::Notifier;
use super::types::{DispatchAck, DispatchPayload};
use super::DispatchConfig;

/// Single-shot JSON POST to the configured webhook URL.
pub struct WebhookNotifier {
    client: Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(config: &DispatchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            endpoint: config.webhook_url.clone(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, payload: &DispatchPayload) -> Result<DispatchAck, DispatchError> {
        debug!(video_url = %payload.video_url, "dispatching to webhook");

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| DispatchError::Unreachable(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            return Err(DispatchError::Rejected { status, body });
        }

        info!(status, "webhook accepted dispatch");
        Ok(DispatchAck { status })
    }
}
