//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` with JSON output and reduces the report to a
//! [`MediaSummary`].

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::time::parse_probe_duration;

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

/// Reduce raw `ffprobe -print_format json` output to a summary
///
/// The container duration wins over the video stream duration.
pub fn parse_probe_output(json: &str) -> Result<MediaSummary, DomainError> {
    let report: ProbeReport = serde_json::from_str(json)
        .map_err(|e| DomainError::ProbeFailed(format!("unreadable ffprobe output: {}", e)))?;

    let video = report
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"));

    let duration = report
        .format
        .as_ref()
        .and_then(|format| format.duration.as_deref())
        .and_then(parse_probe_duration)
        .or_else(|| {
            video
                .and_then(|stream| stream.duration.as_deref())
                .and_then(parse_probe_duration)
        });

    Ok(MediaSummary {
        duration,
        width: video.and_then(|stream| stream.width),
        height: video.and_then(|stream| stream.height),
        frame_rate: video
            .and_then(|stream| stream.r_frame_rate.clone())
            .filter(|rate| rate != "0/0"),
    })
}

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    program: PathBuf,
}

impl FfprobeAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_media(&self, file_path: &Path) -> Result<MediaSummary, DomainError> {
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(file_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DomainError::ToolUnavailable {
                tool: self.program.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFailed(format!(
                "ffprobe exited with {} for {}",
                output.status,
                file_path.display()
            )));
        }

        let summary = parse_probe_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!(
            file = %file_path.display(),
            duration = ?summary.duration.map(|d| d.to_string()),
            "Probed media"
        );
        Ok(summary)
    }
}
