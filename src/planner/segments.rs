//! Segment boundary planning

use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{SegmentSpec, Timestamp};
use crate::planner::SegmentPlan;

/// Extension used when the input file has none
pub const FALLBACK_EXTENSION: &str = "mp4";

/// Turns raw cut points into an ordered list of segments
#[derive(Debug, Clone)]
pub struct SegmentPlanner {
    prefix: String,
    extension: String,
}

impl SegmentPlanner {
    /// Create a planner naming segments `{prefix}_segment_{index}.{extension}`
    pub fn new(prefix: impl Into<String>, extension: Option<&str>) -> Self {
        let extension = extension
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .unwrap_or(FALLBACK_EXTENSION);

        Self {
            prefix: prefix.into(),
            extension: extension.to_string(),
        }
    }

    /// Output file name for a 1-based segment index
    pub fn file_name(&self, index: usize) -> String {
        format!("{}_segment_{}.{}", self.prefix, index, self.extension)
    }

    /// Plan segments from raw cut points
    ///
    /// Duplicates collapse and `00:00:00` is always the first boundary. The
    /// last segment is open-ended; the transcoder stops at the real end of
    /// the stream.
    pub fn plan<S: AsRef<str>>(&self, raw_timestamps: &[S]) -> Result<SegmentPlan, DomainError> {
        if raw_timestamps.is_empty() {
            return Err(DomainError::NoTimestamps);
        }

        let mut unique = raw_timestamps
            .iter()
            .map(|raw| Timestamp::normalize(raw.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        unique.insert(Timestamp::ZERO);

        let boundaries: Vec<Timestamp> = unique.into_iter().collect();
        let segments = boundaries
            .iter()
            .enumerate()
            .map(|(i, start)| SegmentSpec {
                index: i + 1,
                start: *start,
                end: boundaries.get(i + 1).copied(),
                file_name: self.file_name(i + 1),
            })
            .collect::<Vec<_>>();

        debug!(
            boundaries = ?boundaries.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Planned {} segments",
            segments.len()
        );

        Ok(SegmentPlan {
            boundaries,
            segments,
        })
    }
}
