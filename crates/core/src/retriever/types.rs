//! Types shared by the retrieval strategies.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// One retrieval invocation, owned by the orchestrator for its lifetime.
///
/// The working directory is namespaced by `correlation_id` so concurrent
/// jobs never collide on filenames, and is removed by the orchestrator
/// when the job reaches a terminal state.
#[derive(Debug, Clone)]
pub struct RetrievalJob {
    /// Unique token for this invocation, used to namespace temp files
    /// and to correlate logs across components.
    pub correlation_id: String,
    /// The source media URL (already allow-list validated).
    pub source_url: Url,
    /// Scratch directory exclusive to this job.
    pub work_dir: PathBuf,
    /// Credential to inject into the extraction tool, if any.
    ///
    /// The orchestrator always creates jobs without a credential; the
    /// [`AuthenticatedRetriever`](super::AuthenticatedRetriever) decorator
    /// sets this per attempt.
    pub credential: Option<Credential>,
}

impl RetrievalJob {
    /// Returns a copy of this job with the credential replaced.
    pub fn with_credential(&self, credential: Option<Credential>) -> Self {
        Self {
            credential,
            ..self.clone()
        }
    }
}

/// Credential material for authenticated retrieval.
///
/// Supplied externally through configuration and treated as opaque.
/// The `Debug` impl redacts the value; only the kind may ever be logged.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credential {
    /// Netscape-format cookie file on disk.
    CookieFile { cookie_file: PathBuf },
    /// Raw `Cookie:` header value.
    CookieHeader { cookie_header: String },
    /// Platform session token (e.g. an Instagram `sessionid`).
    SessionToken { session_token: String },
}

impl Credential {
    /// Short label for log lines and failure messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::CookieFile { .. } => "cookie_file",
            Credential::CookieHeader { .. } => "cookie_header",
            Credential::SessionToken { .. } => "session_token",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential::{}(<redacted>)", self.kind())
    }
}

/// A local media file produced by a retrieval strategy.
///
/// Construction enforces the non-empty-file invariant: an artifact can
/// only exist for a file that is present and has at least one byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedArtifact {
    path: PathBuf,
    size_bytes: u64,
}

impl RetrievedArtifact {
    /// Builds an artifact from a path, returning `None` when the file
    /// is missing, empty, not a regular file, or cannot be inspected.
    pub async fn try_from_path(path: &Path) -> Option<Self> {
        let meta = tokio::fs::metadata(path).await.ok()?;
        if !meta.is_file() || meta.len() == 0 {
            return None;
        }
        Some(Self {
            path: path.to_path_buf(),
            size_bytes: meta.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// File name component, used by relay backends for upload paths.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_credential_debug_redacts_value() {
        let cred = Credential::SessionToken {
            session_token: "super-secret-token".to_string(),
        };
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("session_token"));
    }

    #[test]
    fn test_credential_deserialize_untagged() {
        let cred: Credential = toml::from_str(r#"session_token = "abc""#).unwrap();
        assert_eq!(cred.kind(), "session_token");

        let cred: Credential = toml::from_str(r#"cookie_file = "/tmp/cookies.txt""#).unwrap();
        assert_eq!(cred.kind(), "cookie_file");
    }

    #[tokio::test]
    async fn test_artifact_rejects_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.mp4");
        std::fs::File::create(&path).unwrap();
        assert!(RetrievedArtifact::try_from_path(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_artifact_rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.mp4");
        assert!(RetrievedArtifact::try_from_path(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_artifact_accepts_non_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("video.mp4");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"not actually mp4").unwrap();

        let artifact = RetrievedArtifact::try_from_path(&path).await.unwrap();
        assert_eq!(artifact.size_bytes(), 16);
        assert_eq!(artifact.file_name(), "video.mp4");
    }
}
