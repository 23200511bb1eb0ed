//! Remux step: stitches separately-downloaded audio and video tracks
//! into one playable container without re-encoding.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::retriever::process::run_tool;
use crate::retriever::RetrievedArtifact;

use super::{find_audio_sidecar, LocatorConfig};

/// Resolves the final playable artifact for a job.
///
/// When an audio-only sidecar sits next to the located video, ffmpeg
/// copies both streams into `<correlationId>.merged.mp4`. Remux failure
/// (or a missing ffmpeg) degrades to the video-only candidate with a
/// warning, never a hard failure.
pub async fn finalize(
    artifact: RetrievedArtifact,
    work_dir: &Path,
    correlation_id: &str,
    config: &LocatorConfig,
) -> RetrievedArtifact {
    let Some(sidecar) = find_audio_sidecar(work_dir, correlation_id, config).await else {
        return artifact;
    };

    debug!(
        correlation_id,
        video = %artifact.path().display(),
        audio = %sidecar.display(),
        "found audio sidecar, remuxing"
    );

    match remux(&artifact, &sidecar, work_dir, correlation_id, config).await {
        Some(merged) => merged,
        None => {
            warn!(
                correlation_id,
                "remux failed, continuing with video-only artifact"
            );
            artifact
        }
    }
}

async fn remux(
    video: &RetrievedArtifact,
    audio: &Path,
    work_dir: &Path,
    correlation_id: &str,
    config: &LocatorConfig,
) -> Option<RetrievedArtifact> {
    let output_path = work_dir.join(format!("{correlation_id}.merged.mp4"));
    let args = vec![
        "-y".to_string(),
        "-i".to_string(),
        video.path().to_string_lossy().to_string(),
        "-i".to_string(),
        audio.to_string_lossy().to_string(),
        "-c".to_string(),
        "copy".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        output_path.to_string_lossy().to_string(),
    ];

    let timeout = Duration::from_secs(config.remux_timeout_secs);
    match run_tool(&config.ffmpeg_bin, &args, timeout).await {
        Ok(Some(out)) if out.success => RetrievedArtifact::try_from_path(&output_path).await,
        Ok(Some(out)) => {
            warn!(tool = %config.ffmpeg_bin, tail = %out.diagnostic_tail(), "remux exited with error");
            None
        }
        Ok(None) => {
            warn!(tool = %config.ffmpeg_bin, "remux timed out");
            None
        }
        Err(e) => {
            warn!(tool = %config.ffmpeg_bin, "remux tool unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, vec![0u8; bytes]).unwrap();
        path
    }

    /// Config pointing at a binary that does not exist, to exercise the
    /// degraded path without depending on ffmpeg being installed.
    fn broken_ffmpeg() -> LocatorConfig {
        LocatorConfig {
            ffmpeg_bin: "reelay-test-no-such-ffmpeg".to_string(),
            ..LocatorConfig::default()
        }
    }

    #[tokio::test]
    async fn test_no_sidecar_passes_through() {
        let dir = TempDir::new().unwrap();
        let video = write(&dir, "job.mp4", 1_000);
        let artifact = RetrievedArtifact::try_from_path(&video).await.unwrap();

        let result = finalize(artifact.clone(), dir.path(), "job", &broken_ffmpeg()).await;
        assert_eq!(result, artifact);
    }

    #[tokio::test]
    async fn test_remux_failure_degrades_to_video_only() {
        let dir = TempDir::new().unwrap();
        let video = write(&dir, "job.mp4", 1_000);
        write(&dir, "job.m4a", 500);
        let artifact = RetrievedArtifact::try_from_path(&video).await.unwrap();

        let result = finalize(artifact.clone(), dir.path(), "job", &broken_ffmpeg()).await;
        assert_eq!(result, artifact);
    }

    #[tokio::test]
    async fn test_remux_success_uses_merged_file() {
        let dir = TempDir::new().unwrap();
        let video = write(&dir, "job.webm", 1_000);
        write(&dir, "job.m4a", 500);
        let artifact = RetrievedArtifact::try_from_path(&video).await.unwrap();

        // Stand-in remux tool: writes a non-empty merged file and
        // exits 0, same observable contract as ffmpeg -c copy.
        let fake = dir.path().join("fake-ffmpeg.sh");
        std::fs::write(
            &fake,
            format!(
                "#!/bin/sh\nprintf merged > {}\n",
                dir.path().join("job.merged.mp4").display()
            ),
        )
        .unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let config = LocatorConfig {
            ffmpeg_bin: fake.to_string_lossy().to_string(),
            ..LocatorConfig::default()
        };
        let result = finalize(artifact, dir.path(), "job", &config).await;
        assert_eq!(result.file_name(), "job.merged.mp4");
        assert!(result.size_bytes() > 0);
    }
}
