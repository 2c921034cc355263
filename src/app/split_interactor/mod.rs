// Split interactor - Orchestrates the video splitting use case

use std::sync::Arc;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{CancelFlag, ExecutionCoordinator, JobRun};
use crate::ports::*;

/// Interactor for cutting a video into segments
pub struct SplitInteractor {
    transcode_port: Arc<dyn TranscodePort>,
    coordinator: ExecutionCoordinator,
}

impl SplitInteractor {
    /// Create new split interactor with injected ports
    pub fn new(transcode_port: Arc<dyn TranscodePort>, fs_port: Arc<dyn FsPort>) -> Self {
        Self {
            coordinator: ExecutionCoordinator::new(Arc::clone(&transcode_port), fs_port),
            transcode_port,
        }
    }

    /// Validate the job, confirm the transcoder can start, then preflight
    ///
    /// A bad timestamp is reported without touching ffmpeg, and a missing
    /// ffmpeg is reported before the output directory is created.
    pub async fn execute(&self, job: &Job, cancel: CancelFlag) -> Result<JobRun, DomainError> {
        let planned = self.coordinator.plan(job).await?;

        let banner = self.transcode_port.check_available().await?;
        info!(%banner, planned = planned.planned(), "Transcoder ready");

        self.coordinator.start(planned, cancel).await
    }
}
