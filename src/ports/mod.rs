// Ports - Interface definitions (contracts)

use async_trait::async_trait;
use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::command::TranscodeCommand;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe media file for duration and primary video stream details
    async fn probe_media(&self, file_path: &Path) -> Result<MediaSummary, DomainError>;
}

/// Port for running the external transcoder
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Verify the transcoder can be launched; returns its version banner
    async fn check_available(&self) -> Result<String, DomainError>;

    /// Run one command to completion
    ///
    /// `Err` means the process could not be run at all; a process that ran
    /// and failed is `Ok` with `success == false`.
    async fn transcode(&self, command: &TranscodeCommand) -> Result<TranscodeOutput, DomainError>;
}

/// Outcome of one transcoder invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl TranscodeOutput {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            stderr: stderr.into(),
        }
    }
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Create directory (including parent directories); existing is fine
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Write and remove a scratch file to prove the directory is writable
    async fn check_write_permission(&self, dir_path: &Path) -> Result<(), DomainError>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Get configuration value
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Get configuration value with default
    async fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, DomainError>;

    /// Set configuration value
    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Load configuration from file
    async fn load_config(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Get all configuration keys
    async fn get_all_config_keys(&self) -> Result<Vec<String>, DomainError>;
}
