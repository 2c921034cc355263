//! Plan preview with known media duration

use crate::domain::model::{Timestamp, TranscodeMode};
use crate::planner::{PlanPreview, PreviewRow, SegmentPlan};

impl SegmentPlan {
    /// Summarize the plan against an optional probed media duration
    ///
    /// The plan itself is untouched: the final segment still runs to the end
    /// of media when executed.
    pub fn preview(&self, media_duration: Option<Timestamp>, mode: TranscodeMode) -> PlanPreview {
        let rows: Vec<PreviewRow> = self
            .segments
            .iter()
            .map(|segment| {
                let end = segment.end.or(media_duration);
                PreviewRow {
                    index: segment.index,
                    start: segment.start,
                    end,
                    duration: end.map(|end| end.saturating_sub(segment.start)),
                    file_name: segment.file_name.clone(),
                }
            })
            .collect();

        let total_duration = media_duration.map(|_| {
            Timestamp::from_seconds(
                rows.iter()
                    .filter_map(|row| row.duration)
                    .map(|d| d.as_seconds())
                    .sum(),
            )
        });

        let warnings = match media_duration {
            Some(media_end) => self
                .boundaries
                .iter()
                .filter(|boundary| **boundary > Timestamp::ZERO && **boundary >= media_end)
                .map(|boundary| {
                    format!(
                        "Cut point {} is at or beyond the end of the media ({})",
                        boundary, media_end
                    )
                })
                .collect(),
            None => Vec::new(),
        };

        PlanPreview {
            rows,
            media_duration,
            total_duration,
            mode,
            warnings,
        }
    }
}
