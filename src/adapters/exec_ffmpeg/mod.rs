//! FFmpeg execution adapter
//!
//! Runs the `ffmpeg` binary as a child process, one segment at a time.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::domain::errors::*;
use crate::engine::command::TranscodeCommand;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FfmpegAdapter {
    program: PathBuf,
    segment_timeout: Option<Duration>,
}

impl FfmpegAdapter {
    /// Create new FFmpeg adapter for the given binary
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            segment_timeout: None,
        }
    }

    /// Kill an invocation that runs longer than `limit`
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.segment_timeout = limit;
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

#[async_trait]
impl TranscodePort for FfmpegAdapter {
    async fn check_available(&self) -> Result<String, DomainError> {
        let unavailable = |reason: String| DomainError::ToolUnavailable {
            tool: self.program_name(),
            reason,
        };

        let output = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(unavailable(format!("`-version` exited with {}", output.status)));
        }

        let banner = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        debug!(%banner, "Transcoder available");
        Ok(banner)
    }

    async fn transcode(&self, command: &TranscodeCommand) -> Result<TranscodeOutput, DomainError> {
        let mut process = Command::new(&self.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let execution = process.output();
        let output = match self.segment_timeout {
            Some(limit) => timeout(limit, execution).await.map_err(|_| {
                DomainError::Internal(format!(
                    "{} timed out after {}s and was killed",
                    self.program_name(),
                    limit.as_secs()
                ))
            })?,
            None => execution.await,
        }
        .map_err(|e| DomainError::ToolUnavailable {
            tool: self.program_name(),
            reason: e.to_string(),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if output.status.success() {
            Ok(TranscodeOutput {
                success: true,
                exit_code: output.status.code(),
                stderr,
            })
        } else {
            Ok(TranscodeOutput::failed(output.status.code(), stderr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let adapter = FfmpegAdapter::new("/nonexistent/segcut-ffmpeg");
        assert!(matches!(
            adapter.check_available().await,
            Err(DomainError::ToolUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_transcode_is_an_error() {
        let adapter = FfmpegAdapter::new("/nonexistent/segcut-ffmpeg");
        let command = TranscodeCommand {
            mode: crate::domain::model::TranscodeMode::FastCopy,
            args: vec!["-version".to_string()],
            output: PathBuf::from("out.mp4"),
        };
        assert!(adapter.transcode(&command).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_captures_stderr() {
        let adapter = FfmpegAdapter::new("sh");
        let command = TranscodeCommand {
            mode: crate::domain::model::TranscodeMode::FastCopy,
            args: vec![
                "-c".to_string(),
                "echo 'out.mp4: Permission denied' >&2; exit 1".to_string(),
            ],
            output: PathBuf::from("out.mp4"),
        };

        let output = adapter.transcode(&command).await.unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(1));
        assert!(output.stderr.contains("Permission denied"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_hung_process() {
        let adapter = FfmpegAdapter::new("sh").with_timeout(Some(Duration::from_millis(200)));
        let command = TranscodeCommand {
            mode: crate::domain::model::TranscodeMode::FastCopy,
            args: vec!["-c".to_string(), "sleep 5".to_string()],
            output: PathBuf::from("out.mp4"),
        };

        assert!(matches!(
            adapter.transcode(&command).await,
            Err(DomainError::Internal(_))
        ));
    }
}
