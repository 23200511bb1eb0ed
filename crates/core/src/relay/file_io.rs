//! file.io-style backend: multipart POST, JSON response carrying the
//! link in a `link` field.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::retriever::RetrievedArtifact;

use super::config::FileIoConfig;
use super::error::UploadError;
use super::traits::RelayBackend;
use super::types::{BackendKind, PublicLink};
use super::{map_send_error, stream_artifact, truncate_body};

pub struct FileIoBackend {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl FileIoBackend {
    pub fn new(config: &FileIoConfig) -> Self {
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

#[derive(Debug, Deserialize)]
struct FileIoResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    link: Option<String>,
}

/// Validates the success shape: a JSON body whose `link` field is an
/// absolute http(s) URL, with `success` not explicitly false.
pub(super) fn parse_json_link(body: &str) -> Result<String, UploadError> {
    let parsed: FileIoResponse =
        serde_json::from_str(body).map_err(|_| UploadError::BadResponse(truncate_body(body)))?;

    if parsed.success == Some(false) {
        return Err(UploadError::BadResponse(truncate_body(body)));
    }
    let link = parsed
        .link
        .ok_or_else(|| UploadError::BadResponse(truncate_body(body)))?;
    let url = Url::parse(link.trim()).map_err(|_| UploadError::BadResponse(truncate_body(body)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UploadError::BadResponse(truncate_body(body)));
    }
    Ok(link.trim().to_string())
}

#[async_trait]
impl RelayBackend for FileIoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::FileIo
    }

    async fn upload(&self, artifact: &RetrievedArtifact) -> Result<PublicLink, UploadError> {
        debug!(url = %self.base_url, size_bytes = artifact.size_bytes(), "uploading to file.io backend");

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
            url: parse_json_link(&text)?,
            backend: BackendKind::FileIo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        let link =
            parse_json_link(r#"{"success":true,"link":"https://file.io/abc123"}"#).unwrap();
        assert_eq!(link, "https://file.io/abc123");
    }

    #[test]
    fn test_parse_rejects_missing_link() {
        let result = parse_json_link(r#"{"success":true}"#);
        assert!(matches!(result, Err(UploadError::BadResponse(_))));
    }

    #[test]
    fn test_parse_rejects_explicit_failure() {
        let result = parse_json_link(r#"{"success":false,"link":"https://file.io/abc"}"#);
        assert!(matches!(result, Err(UploadError::BadResponse(_))));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let result = parse_json_link("<html>rate limited</html>");
        assert!(matches!(result, Err(UploadError::BadResponse(_))));
    }

    #[test]
    fn test_parse_rejects_relative_link() {
        let result = parse_json_link(r#"{"link":"/abc123"}"#);
        assert!(matches!(result, Err(UploadError::BadResponse(_))));
    }
}
