//! 0x0.st-style "null pointer" backend: multipart POST, plain-text URL
//! response that must point back at the backend's own host.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use tracing::debug;

use crate::retriever::RetrievedArtifact;

use super::config::NullPointerConfig;
use super::error::UploadError;
use super::traits::RelayBackend;
use super::types::{BackendKind, PublicLink};
use super::{map_send_error, stream_artifact, truncate_body};

pub struct NullPointerBackend {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl NullPointerBackend {
    pub fn new(config: &NullPointerConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Validates the success shape: one absolute URL on the backend's own
/// host, with a non-empty path.
pub(super) fn parse_host_link(body: &str, base_url: &str) -> Result<String, UploadError> {
    let link = body.trim();
    let parsed = Url::parse(link).map_err(|_| UploadError::BadResponse(truncate_body(body)))?;
    let base = Url::parse(base_url).map_err(|_| UploadError::BadResponse(base_url.to_string()))?;

    let same_host = parsed.host_str().is_some() && parsed.host_str() == base.host_str();
    let has_path = parsed.path().len() > 1;
    if !same_host || !has_path {
        return Err(UploadError::BadResponse(truncate_body(body)));
    }
    Ok(link.to_string())
}

#[async_trait]
impl RelayBackend for NullPointerBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::NullPointer
    }

    async fn upload(&self, artifact: &RetrievedArtifact) -> Result<PublicLink, UploadError> {
        debug!(url = %self.base_url, size_bytes = artifact.size_bytes(), "uploading to null pointer backend");

        let (body, len) = stream_artifact(artifact).await?;
        let form = Form::new().part(
            "file",
            Part::stream_with_length(body, len).file_name(artifact.file_name()),
        );

        let response = self
            .client
            .post(&self.base_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout_secs))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(UploadError::Http {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        Ok(PublicLink {
            url: parse_host_link(&text, &self.base_url)?,
            backend: BackendKind::NullPointer,
        })
    }
}
