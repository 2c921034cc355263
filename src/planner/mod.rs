//! Segment planning and plan preview module

use serde::Serialize;

use crate::domain::model::{SegmentSpec, Timestamp, TranscodeMode};

pub mod preview;
pub mod segments;

pub use segments::SegmentPlanner;

/// Ordered, gap-free list of segments for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentPlan {
    /// Canonical cut points, ascending, always starting at `00:00:00`
    pub boundaries: Vec<Timestamp>,
    /// One segment per boundary, in index order
    pub segments: Vec<SegmentSpec>,
}

impl SegmentPlan {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// One row of a plan preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub index: usize,
    pub start: Timestamp,
    /// Concrete end, or the media end when the probe knew it
    pub end: Option<Timestamp>,
    /// Length of the segment when both ends are known
    pub duration: Option<Timestamp>,
    pub file_name: String,
}

/// Plan summary shown before any transcoding happens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanPreview {
    pub rows: Vec<PreviewRow>,
    pub media_duration: Option<Timestamp>,
    /// Sum of the known row durations
    pub total_duration: Option<Timestamp>,
    pub mode: TranscodeMode,
    /// Cut points that sit at or past the end of the media
    pub warnings: Vec<String>,
}

impl PlanPreview {
    /// Rough processing time label for the selected mode
    pub fn estimate_label(&self) -> &'static str {
        match self.mode {
            TranscodeMode::FastCopy => "Fast",
            TranscodeMode::Scaling => "Long",
        }
    }
}
