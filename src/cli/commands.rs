//! Command implementations

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::app::AppContainer;
use crate::cli::args::{PreviewArgs, SplitArgs};
use crate::config_initialization::RuntimeSettings;
use crate::domain::model::ExecutionEvent;
use crate::engine::CancelFlag;
use crate::planner::PlanPreview;
use crate::utils::Utils;

/// Counts reported by a finished split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOutcome {
    pub succeeded: usize,
    pub planned: usize,
    pub cancelled: bool,
}

/// Execute the split command
pub async fn split(
    container: &dyn AppContainer,
    settings: &RuntimeSettings,
    args: SplitArgs,
) -> Result<SplitOutcome> {
    let job = args.to_job(&settings.output_prefix);
    info!(input = %job.input.display(), timestamps = ?job.timestamps, "Starting split");

    let cancel = CancelFlag::new();
    let run = container
        .split_interactor()
        .execute(&job, cancel.clone())
        .await?;

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current segment");
            on_interrupt.cancel();
        }
    });

    let mut events = run.into_channel(settings.event_buffer);
    let mut outcome = None;
    while let Some(event) = events.recv().await {
        if args.json {
            println!(
                "{}",
                serde_json::to_string(&event).context("Failed to serialize event")?
            );
        } else {
            print_event(&event);
        }

        if let ExecutionEvent::Complete {
            succeeded,
            planned,
            outputs,
            cancelled,
        } = event
        {
            if !args.json {
                print_summary(succeeded, planned, &outputs).await;
            }
            outcome = Some(SplitOutcome {
                succeeded,
                planned,
                cancelled,
            });
        }
    }

    outcome.context("Run ended without a completion event")
}

fn print_event(event: &ExecutionEvent) {
    match event {
        ExecutionEvent::Progress { message, .. } => println!("{}", message),
        ExecutionEvent::SegmentSucceeded { path, .. } => {
            println!("  ✓ Created {}", path.display());
        }
        ExecutionEvent::SegmentFailed { path, error, .. } => {
            println!("  ✗ Failed to create {}: {}", path.display(), error);
            if let Some(hint) = error.hint() {
                println!("    Hint: {}", hint);
            }
        }
        ExecutionEvent::Complete { .. } => {}
    }
}

async fn print_summary(succeeded: usize, planned: usize, outputs: &[std::path::PathBuf]) {
    println!();
    println!("{}", summary_line(succeeded, planned));
    for (i, path) in outputs.iter().enumerate() {
        match file_size(path).await {
            Some(size) => println!(
                "  {}. {} ({})",
                i + 1,
                path.display(),
                Utils::format_file_size(size)
            ),
            None => println!("  {}. {}", i + 1, path.display()),
        }
    }
}

fn summary_line(succeeded: usize, planned: usize) -> String {
    if succeeded == planned {
        format!("✓ Successfully created {} of {} video segments:", succeeded, planned)
    } else {
        format!("✗ Created {} of {} video segments:", succeeded, planned)
    }
}

async fn file_size(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|meta| meta.len())
}

/// Execute the preview command
pub async fn preview(
    container: &dyn AppContainer,
    settings: &RuntimeSettings,
    args: PreviewArgs,
) -> Result<()> {
    let job = args.to_job(&settings.output_prefix);
    let report = container.preview_interactor().execute(&job).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize preview to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    println!("Input: {}", job.input.display());
    match (report.media.width, report.media.height) {
        (Some(width), Some(height)) => println!("Resolution: {}x{}", width, height),
        _ => println!("Resolution: unknown"),
    }
    if let Some(rate) = &report.media.frame_rate {
        println!("Frame rate: {}", rate);
    }
    match report.preview.media_duration {
        Some(duration) => println!("Duration: {}", duration),
        None => println!("Duration: unknown"),
    }
    println!("Output directory: {}", job.effective_output_dir().display());
    println!();
    display_preview(&report.preview);
    Ok(())
}

fn display_preview(preview: &PlanPreview) {
    println!(
        "{:>3}  {:<8}  {:<11}  {:<8}  File",
        "#", "Start", "End", "Length"
    );
    for row in &preview.rows {
        let end = row
            .end
            .map(|end| end.to_string())
            .unwrap_or_else(|| "end of media".to_string());
        let length = row
            .duration
            .map(|duration| duration.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}  {:<8}  {:<11}  {:<8}  {}",
            row.index, row.start, end, length, row.file_name
        );
    }

    println!();
    println!("Segments: {}", preview.rows.len());
    if let Some(total) = preview.total_duration {
        println!("Total length: {}", total);
    }
    println!("Mode: {} ({})", preview.mode, preview.estimate_label());
    for warning in &preview.warnings {
        println!("Warning: {}", warning);
    }
}
