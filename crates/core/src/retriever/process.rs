//! Bounded subprocess invocation shared by the extraction strategies
//! and the remux step.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of one tool invocation.
#[derive(Debug)]
pub(crate) struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Last few stderr lines, for failure messages. Falls back to
    /// stdout when stderr is empty (some tools report errors there).
    pub fn diagnostic_tail(&self) -> String {
        let source = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        tail_lines(source, 12)
    }
}

/// Runs a tool with the given arguments, capturing stdout and stderr.
///
/// Returns `Ok(None)` when the deadline expires; the process is killed
/// and reaped before returning. Stdin is closed so interactive prompts
/// fail fast instead of hanging.
pub(crate) async fn run_tool(
    bin: &str,
    args: &[String],
    limit: Duration,
) -> std::io::Result<Option<ToolOutput>> {
    debug!(tool = bin, ?args, "spawning external tool");

    let mut child = Command::new(bin)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut out_pipe = child.stdout.take();
    let mut err_pipe = child.stderr.take();

    // Drain both pipes concurrently while waiting; reading one after
    // the other can deadlock a tool blocked on a full pipe.
    let wait = async {
        let stdout_fut = async {
            let mut buf = String::new();
            if let Some(pipe) = out_pipe.as_mut() {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        };
        let stderr_fut = async {
            let mut buf = String::new();
            if let Some(pipe) = err_pipe.as_mut() {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        };
        let (stdout, stderr) = tokio::join!(stdout_fut, stderr_fut);
        let status = child.wait().await?;
        Ok::<ToolOutput, std::io::Error>(ToolOutput {
            success: status.success(),
            stdout,
            stderr,
        })
    };

    match tokio::time::timeout(limit, wait).await {
        Ok(output) => {
            let output = output?;
            if !output.success {
                debug!(tool = bin, tail = %output.diagnostic_tail(), "tool exited with error");
            }
            Ok(Some(output))
        }
        Err(_) => {
            warn!(tool = bin, timeout_secs = limit.as_secs(), "tool timed out, killing");
            let _ = child.kill().await;
            let _ = child.wait().await;
            Ok(None)
        }
    }
}

/// Last `n` non-empty lines of `text`, joined with newlines.
pub(crate) fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
