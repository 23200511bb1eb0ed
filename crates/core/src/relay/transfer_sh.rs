//! transfer.sh-style backend: raw PUT, plain-text URL response.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::retriever::RetrievedArtifact;

use super::config::TransferShConfig;
use super::error::UploadError;
use super::traits::RelayBackend;
use super::types::{BackendKind, PublicLink};
use super::{map_send_error, stream_artifact, truncate_body};

static PLAIN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("static regex"));

pub struct TransferShBackend {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl TransferShBackend {
    pub fn new(config: &TransferShConfig) -> Self {
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

/// Validates the documented success shape: the whole body, trimmed, is
/// one absolute http(s) URL.
pub(super) fn parse_plain_link(body: &str) -> Result<String, UploadError> {
    let link = body.trim();
    if link.is_empty() || !PLAIN_LINK.is_match(link) {
        return Err(UploadError::BadResponse(truncate_body(body)));
    }
    Ok(link.to_string())
}

#[async_trait]
impl RelayBackend for TransferShBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::TransferSh
    }

    async fn upload(&self, artifact: &RetrievedArtifact) -> Result<PublicLink, UploadError> {
        let file_name = artifact.file_name();
        let url = format!("{}/{}", self.base_url, urlencoding::encode(&file_name));
        debug!(url = %url, size_bytes = artifact.size_bytes(), "uploading to transfer.sh backend");

        let (body, len) = stream_artifact(artifact).await?;
        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, len)
            .body(body)
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
            url: parse_plain_link(&text)?,
            backend: BackendKind::TransferSh,
        })
    }
}
