//! Core segment execution engine module

pub mod command;
pub mod coordinator;

pub use command::{TranscodeCommand, TranscodeCommandBuilder};
pub use coordinator::{CancelFlag, ExecutionCoordinator, JobRun, PlannedJob};
