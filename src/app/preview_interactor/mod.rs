// Preview interactor - Plans a job and summarizes it without transcoding

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::ScaleProfileResolver;
use crate::planner::{PlanPreview, SegmentPlanner};
use crate::ports::*;

/// Probe details plus the planned segments
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    pub media: MediaSummary,
    pub preview: PlanPreview,
}

/// Interactor for previewing a split
pub struct PreviewInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
}

impl PreviewInteractor {
    pub fn new(probe_port: Arc<dyn ProbePort>, fs_port: Arc<dyn FsPort>) -> Self {
        Self {
            probe_port,
            fs_port,
        }
    }

    /// Plan the job and estimate each segment against the probed duration
    ///
    /// A failed probe is not fatal: the preview falls back to an unknown
    /// media length and carries a warning.
    pub async fn execute(&self, job: &Job) -> Result<PreviewReport, DomainError> {
        if !self.fs_port.file_exists(&job.input).await? {
            return Err(DomainError::InputNotFound {
                path: job.input.clone(),
            });
        }

        let plan = SegmentPlanner::new(&job.output_prefix, job.source_extension().as_deref())
            .plan(&job.timestamps)?;
        let profile = ScaleProfileResolver::resolve(job.scale.as_deref())?;
        let mode = TranscodeMode::for_profile(profile.as_ref());

        let (media, probe_warning) = match self.probe_port.probe_media(&job.input).await {
            Ok(media) => (media, None),
            Err(err) => {
                warn!(input = %job.input.display(), error = %err, "Probe failed; media length unknown");
                (
                    MediaSummary::default(),
                    Some(format!("Media length unknown: {}", err)),
                )
            }
        };

        let mut preview = plan.preview(media.duration, mode);
        preview.warnings.extend(probe_warning);
        Ok(PreviewReport { media, preview })
    }
}
