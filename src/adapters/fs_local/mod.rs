// Local filesystem adapter - File system operations for the output side

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Local filesystem adapter
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        Ok(file_path.is_file())
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir_path).map_err(|e| DomainError::PermissionDenied {
            dir: dir_path.to_path_buf(),
            reason: format!("failed to create directory: {}", e),
        })
    }

    async fn check_write_permission(&self, dir_path: &Path) -> Result<(), DomainError> {
        let denied = |e: std::io::Error| DomainError::PermissionDenied {
            dir: dir_path.to_path_buf(),
            reason: e.to_string(),
        };

        // `close` deletes the scratch file
        let mut probe = tempfile::Builder::new()
            .prefix("temp_permission_test")
            .suffix(".tmp")
            .tempfile_in(dir_path)
            .map_err(denied)?;
        probe.write_all(b"test").map_err(denied)?;
        probe.close().map_err(denied)?;
        Ok(())
    }
}
