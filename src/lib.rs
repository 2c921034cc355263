//! segcut library
//!
//! Plans cut points in a video and drives `ffmpeg` to produce one file per
//! segment, either by stream copy or by re-encoding to a scale profile.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{DomainError, FailureReason, SegmentFailure};
pub use domain::model::{ExecutionEvent, Job, ScaleProfile, SegmentSpec, Timestamp, TranscodeMode};
pub use engine::{CancelFlag, ExecutionCoordinator, JobRun};
pub use planner::{PlanPreview, SegmentPlan, SegmentPlanner};
