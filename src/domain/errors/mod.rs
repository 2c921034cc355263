// Domain errors - Error types for the domain layer

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a job before any segment is executed
#[derive(Error, Debug)]
pub enum DomainError {
    /// Timestamp could not be parsed
    #[error("Invalid timestamp format: '{raw}'. Expected HH:MM:SS, MM:SS, or SS")]
    InvalidTimestampFormat { raw: String },

    /// Scale selector could not be parsed
    #[error(
        "Invalid scale setting: '{raw}'. Use presets (720p, 480p, 360p, 240p) or custom format (width:height[:bitrate])"
    )]
    InvalidScaleFormat { raw: String },

    /// No cut points supplied
    #[error("At least one timestamp is required")]
    NoTimestamps,

    /// Input media file does not exist
    #[error("Input video file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output directory is not writable
    #[error("No write permission in directory '{dir}': {reason}")]
    PermissionDenied { dir: PathBuf, reason: String },

    /// External tool missing or not runnable
    #[error("{tool} is not installed or not found in PATH: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    /// Media probe failed
    #[error("Failed to probe media file: {0}")]
    ProbeFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Best-effort cause guessed from transcoder stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    PermissionDenied,
    MissingFile,
    InvalidArgument,
    Other,
}

impl FailureReason {
    /// Suggestion shown to the user next to the failure
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FailureReason::PermissionDenied => Some(
                "The file may be open in another application, or the output directory is not writable",
            ),
            FailureReason::MissingFile => Some("Check that the input file path is correct"),
            FailureReason::InvalidArgument => {
                Some("Check that the input file is a valid video format")
            }
            FailureReason::Other => None,
        }
    }
}

/// Failure of a single segment; never aborts the job
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentFailure {
    /// Transcoder ran and exited unsuccessfully
    #[error("transcoder exited with {}: {stderr}", exit_label(.exit_code))]
    Process {
        reason: FailureReason,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Anything else (spawn failure, timeout, I/O)
    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl SegmentFailure {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SegmentFailure::Process { reason, .. } => reason.hint(),
            SegmentFailure::Unexpected { .. } => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code".to_string(),
    }
}

