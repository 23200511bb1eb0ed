//! Generic retrieval via the `yt-dlp` CLI.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::locator::{self, LocatorConfig};

use super::config::RetrieverConfig;
use super::error::{LocateError, RetrieveError};
use super::process::run_tool;
use super::traits::Retriever;
use super::types::{Credential, RetrievalJob, RetrievedArtifact};

const TOOL: &str = "yt-dlp";

/// Retrieval strategy wrapping the yt-dlp CLI.
///
/// Output is templated as `<workDir>/<correlationId>.%(ext)s`, so
/// whatever container yt-dlp settles on, the file carries the job's
/// correlation id. Separately-downloaded audio tracks left next to the
/// video are picked up later by the remux step.
pub struct YtDlpRetriever {
    bin: String,
    timeout: Duration,
    locator: LocatorConfig,
}

impl YtDlpRetriever {
    pub fn new(config: &RetrieverConfig, locator: &LocatorConfig) -> Self {
        Self {
            bin: config.ytdlp_bin.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            locator: locator.clone(),
        }
    }

    fn build_args(&self, job: &RetrievalJob) -> Vec<String> {
        let template = job
            .work_dir
            .join(format!("{}.%(ext)s", job.correlation_id))
            .to_string_lossy()
            .to_string();

        let mut args = vec![
            "-o".to_string(),
            template,
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
        ];

        match &job.credential {
            Some(Credential::CookieFile { cookie_file }) => {
                args.push("--cookies".to_string());
                args.push(cookie_file.to_string_lossy().to_string());
            }
            Some(Credential::CookieHeader { cookie_header }) => {
                args.push("--add-header".to_string());
                args.push(format!("Cookie: {}", cookie_header));
            }
            Some(Credential::SessionToken { session_token }) => {
                args.push("--add-header".to_string());
                args.push(format!("Cookie: sessionid={}", session_token));
            }
            None => {}
        }

        args.push(job.source_url.to_string());
        args
    }
}

#[async_trait]
impl Retriever for YtDlpRetriever {
    fn id(&self) -> &'static str {
        TOOL
    }

    async fn retrieve(&self, job: &RetrievalJob) -> Result<RetrievedArtifact, RetrieveError> {
        tokio::fs::create_dir_all(&job.work_dir).await?;

        let args = self.build_args(job);
        let output = run_tool(&self.bin, &args, self.timeout).await?;

        match locator::locate(&job.work_dir, &job.correlation_id, &self.locator).await {
            Ok(artifact) => {
                debug!(
                    correlation_id = %job.correlation_id,
                    path = %artifact.path().display(),
                    size_bytes = artifact.size_bytes(),
                    "yt-dlp produced artifact"
                );
                Ok(artifact)
            }
            Err(LocateError::NoArtifactFound { .. }) => match output {
                Some(out) if out.success => Err(RetrieveError::NoArtifactFound {
                    correlation_id: job.correlation_id.clone(),
                }),
                Some(out) => Err(RetrieveError::ProcessFailure {
                    tool: TOOL.to_string(),
                    detail: out.diagnostic_tail(),
                }),
                None => Err(RetrieveError::ProcessFailure {
                    tool: TOOL.to_string(),
                    detail: format!("timed out after {}s", self.timeout.as_secs()),
                }),
            },
            Err(LocateError::Io(e)) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job(credential: Option<Credential>) -> RetrievalJob {
        RetrievalJob {
            correlation_id: "job-2".to_string(),
            source_url: "https://www.instagram.com/reel/XYZ/".parse().unwrap(),
            work_dir: PathBuf::from("/tmp/reelay/job-2"),
            credential,
        }
    }

    fn retriever() -> YtDlpRetriever {
        YtDlpRetriever::new(&RetrieverConfig::default(), &LocatorConfig::default())
    }

    #[test]
    fn test_output_template_keyed_by_correlation_id() {
        let args = retriever().build_args(&job(None));
        assert_eq!(args[0], "-o");
        assert!(args[1].ends_with("job-2.%(ext)s"));
    }

    #[test]
    fn test_cookie_file_arg() {
        let args = retriever().build_args(&job(Some(Credential::CookieFile {
            cookie_file: PathBuf::from("/tmp/cookies.txt"),
        })));
        let idx = args.iter().position(|a| a == "--cookies").unwrap();
        assert_eq!(args[idx + 1], "/tmp/cookies.txt");
    }

    #[test]
    fn test_session_token_becomes_cookie_header() {
        let args = retriever().build_args(&job(Some(Credential::SessionToken {
            session_token: "tok".to_string(),
        })));
        let idx = args.iter().position(|a| a == "--add-header").unwrap();
        assert_eq!(args[idx + 1], "Cookie: sessionid=tok");
    }
}
