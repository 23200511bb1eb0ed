//! Media locator: finds the artifact a retrieval tool produced.
//!
//! Extraction tools name outputs unpredictably across versions, so the
//! locator never trusts a single expected path. Preferred match is the
//! file literally named `<correlationId>.<primary extension>`; failing
//! that, any file whose name starts with the correlation id, ranked by
//! extension preference and then by byte size (the real video track is
//! the large one, auxiliary files are small).

mod remux;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::retriever::{LocateError, RetrievedArtifact};

pub use remux::finalize;

/// Configuration for artifact selection and the remux step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Video container extensions in preference order; the first entry
    /// is the primary container.
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Extensions treated as audio-only sidecar tracks.
    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,

    /// Path or name of the ffmpeg binary used for remuxing.
    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: String,

    /// Timeout for one remux invocation (seconds).
    #[serde(default = "default_remux_timeout")]
    pub remux_timeout_secs: u64,
}

fn default_video_extensions() -> Vec<String> {
    ["mp4", "mkv", "webm", "mov"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_audio_extensions() -> Vec<String> {
    ["m4a", "aac", "opus", "ogg", "mp3"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_ffmpeg_bin() -> String {
    "ffmpeg".to_string()
}

fn default_remux_timeout() -> u64 {
    120
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            video_extensions: default_video_extensions(),
            audio_extensions: default_audio_extensions(),
            ffmpeg_bin: default_ffmpeg_bin(),
            remux_timeout_secs: default_remux_timeout(),
        }
    }
}

/// Locates the retrieved video for a job in its working directory.
pub async fn locate(
    work_dir: &Path,
    correlation_id: &str,
    config: &LocatorConfig,
) -> Result<RetrievedArtifact, LocateError> {
    // Preferred: the exact name we asked the tool to use.
    if let Some(primary) = config.video_extensions.first() {
        let expected = work_dir.join(format!("{correlation_id}.{primary}"));
        if let Some(artifact) = RetrievedArtifact::try_from_path(&expected).await {
            return Ok(artifact);
        }
    }

    // Fallback: scan for prefix matches, best extension rank first,
    // largest file among equals.
    let mut best: Option<(usize, u64, PathBuf)> = None;
    let mut entries = tokio::fs::read_dir(work_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(correlation_id) {
            continue;
        }
        let Some(rank) = extension_rank(&name, &config.video_extensions) else {
            continue;
        };
        let meta = match entry.metadata().await {
            Ok(m) if m.is_file() && m.len() > 0 => m,
            _ => continue,
        };
        let candidate = (rank, meta.len(), entry.path());
        best = match best {
            None => Some(candidate),
            Some(current) => {
                if candidate.0 < current.0 || (candidate.0 == current.0 && candidate.1 > current.1)
                {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }

    match best {
        Some((_, size, path)) => {
            debug!(
                correlation_id,
                path = %path.display(),
                size_bytes = size,
                "located artifact via prefix scan"
            );
            RetrievedArtifact::try_from_path(&path)
                .await
                .ok_or_else(|| LocateError::NoArtifactFound {
                    correlation_id: correlation_id.to_string(),
                })
        }
        None => Err(LocateError::NoArtifactFound {
            correlation_id: correlation_id.to_string(),
        }),
    }
}

/// Finds an audio-only sidecar for the job, if the tool downloaded the
/// tracks separately. Returns the largest non-empty match.
pub(crate) async fn find_audio_sidecar(
    work_dir: &Path,
    correlation_id: &str,
    config: &LocatorConfig,
) -> Option<PathBuf> {
    let mut best: Option<(u64, PathBuf)> = None;
    let mut entries = tokio::fs::read_dir(work_dir).await.ok()?;
    while let Some(entry) = entries.next_entry().await.ok()? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(correlation_id) {
            continue;
        }
        if extension_rank(&name, &config.audio_extensions).is_none() {
            continue;
        }
        let meta = match entry.metadata().await {
            Ok(m) if m.is_file() && m.len() > 0 => m,
            _ => continue,
        };
        if best.as_ref().is_none_or(|(size, _)| meta.len() > *size) {
            best = Some((meta.len(), entry.path()));
        }
    }
    best.map(|(_, path)| path)
}

fn extension_rank(name: &str, extensions: &[String]) -> Option<usize> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    extensions.iter().position(|e| *e == ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: usize) {
        std::fs::write(dir.path().join(name), vec![0u8; bytes]).unwrap();
    }

    #[tokio::test]
    async fn test_exact_name_preferred() {
        let dir = TempDir::new().unwrap();
        write(&dir, "job.mp4", 10);
        write(&dir, "job-extra.mp4", 10_000);

        let artifact = locate(dir.path(), "job", &LocatorConfig::default())
            .await
            .unwrap();
        assert_eq!(artifact.file_name(), "job.mp4");
    }

    #[tokio::test]
    async fn test_extension_preference_beats_size() {
        let dir = TempDir::new().unwrap();
        write(&dir, "job_UTC.mkv", 50_000);
        write(&dir, "job_UTC.mp4", 100);

        let artifact = locate(dir.path(), "job", &LocatorConfig::default())
            .await
            .unwrap();
        assert_eq!(artifact.file_name(), "job_UTC.mp4");
    }

    #[tokio::test]
    async fn test_largest_wins_within_extension() {
        let dir = TempDir::new().unwrap();
        write(&dir, "job_1.mp4", 100);
        write(&dir, "job_2.mp4", 9_000);
        write(&dir, "job_3.mp4", 500);

        let artifact = locate(dir.path(), "job", &LocatorConfig::default())
            .await
            .unwrap();
        assert_eq!(artifact.file_name(), "job_2.mp4");
    }

    #[tokio::test]
    async fn test_empty_files_and_other_jobs_ignored() {
        let dir = TempDir::new().unwrap();
        write(&dir, "job.mp4", 0);
        write(&dir, "otherjob.mp4", 5_000);
        write(&dir, "job.json", 200);

        let result = locate(dir.path(), "job", &LocatorConfig::default()).await;
        assert!(matches!(
            result,
            Err(LocateError::NoArtifactFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_files_at_all() {
        let dir = TempDir::new().unwrap();
        let result = locate(dir.path(), "job", &LocatorConfig::default()).await;
        assert!(matches!(
            result,
            Err(LocateError::NoArtifactFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_audio_sidecar_largest() {
        let dir = TempDir::new().unwrap();
        write(&dir, "job.m4a", 4_000);
        write(&dir, "job.ogg", 400);
        write(&dir, "job.mp4", 9_000);

        let sidecar = find_audio_sidecar(dir.path(), "job", &LocatorConfig::default())
            .await
            .unwrap();
        assert!(sidecar.ends_with("job.m4a"));
    }

    #[tokio::test]
    async fn test_no_sidecar() {
        let dir = TempDir::new().unwrap();
        write(&dir, "job.mp4", 9_000);
        let sidecar = find_audio_sidecar(dir.path(), "job", &LocatorConfig::default()).await;
        assert!(sidecar.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = LocatorConfig::default();
        assert_eq!(config.video_extensions[0], "mp4");
        assert_eq!(config.ffmpeg_bin, "ffmpeg");
        assert_eq!(config.remux_timeout_secs, 120);
    }
}
