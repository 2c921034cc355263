//! Sequential execution of a planned job

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, SegmentFailure};
use crate::domain::model::{ExecutionEvent, Job, ScaleProfile, SegmentSpec, TranscodeMode};
use crate::domain::rules::{FailureClassifier, ScaleProfileResolver};
use crate::engine::command::TranscodeCommandBuilder;
use crate::planner::{SegmentPlan, SegmentPlanner};
use crate::ports::{FsPort, TranscodePort};
use crate::utils::path::{display_name, SafeFileNamer};

/// Cooperative cancellation shared between a run and its controller
///
/// Checked only between segments; an in-flight transcode always finishes.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Validates, plans and preflights jobs, then hands out lazy runs
pub struct ExecutionCoordinator {
    transcoder: Arc<dyn TranscodePort>,
    fs: Arc<dyn FsPort>,
}

impl ExecutionCoordinator {
    pub fn new(transcoder: Arc<dyn TranscodePort>, fs: Arc<dyn FsPort>) -> Self {
        Self { transcoder, fs }
    }

    /// Prepare a job for execution
    ///
    /// Every error here happens before any segment runs. The returned
    /// [`JobRun`] does no work until it is polled.
    pub async fn run(&self, job: &Job, cancel: CancelFlag) -> Result<JobRun, DomainError> {
        let planned = self.plan(job).await?;
        self.start(planned, cancel).await
    }

    /// Validate input, timestamps and scale without touching the output side
    pub async fn plan(&self, job: &Job) -> Result<PlannedJob, DomainError> {
        if !self.fs.file_exists(&job.input).await? {
            return Err(DomainError::InputNotFound {
                path: job.input.clone(),
            });
        }

        let planner = SegmentPlanner::new(&job.output_prefix, job.source_extension().as_deref());
        let plan = planner.plan(&job.timestamps)?;
        let profile = ScaleProfileResolver::resolve(job.scale.as_deref())?;
        info!(
            input = %job.input.display(),
            segments = plan.len(),
            mode = %TranscodeMode::for_profile(profile.as_ref()),
            "Job planned"
        );

        Ok(PlannedJob {
            job: job.clone(),
            plan,
            profile,
        })
    }

    /// Create the output directory and check it is writable, then hand out the run
    pub async fn start(
        &self,
        planned: PlannedJob,
        cancel: CancelFlag,
    ) -> Result<JobRun, DomainError> {
        self.preflight(&planned.job).await?;

        Ok(JobRun::new(
            &planned.job,
            planned.plan,
            planned.profile,
            Arc::clone(&self.transcoder),
            cancel,
        ))
    }

    async fn preflight(&self, job: &Job) -> Result<(), DomainError> {
        let dir = job.effective_output_dir().to_path_buf();
        let denied = |err: DomainError| match err {
            DomainError::PermissionDenied { .. } => err,
            other => DomainError::PermissionDenied {
                dir: dir.clone(),
                reason: other.to_string(),
            },
        };

        if let Some(output_dir) = &job.output_dir {
            self.fs.create_directory(output_dir).await.map_err(denied)?;
        }
        self.fs.check_write_permission(&dir).await.map_err(denied)?;
        debug!(dir = %dir.display(), "Output directory is writable");
        Ok(())
    }
}

/// A validated job whose output side has not been touched yet
#[derive(Debug, Clone)]
pub struct PlannedJob {
    job: Job,
    plan: SegmentPlan,
    profile: Option<ScaleProfile>,
}

impl PlannedJob {
    pub fn planned(&self) -> usize {
        self.plan.len()
    }
}

enum RunPhase {
    /// About to announce the segment at this position
    Start(usize),
    /// Announced; transcode on the next pull
    Invoke { position: usize, output: PathBuf },
    Finish { cancelled: bool },
    Done,
}

/// Lazy, single-use sequence of events for one job
///
/// Each call to [`JobRun::next_event`] advances the run by at most one
/// transcoder invocation.
pub struct JobRun {
    job: Job,
    segments: Vec<SegmentSpec>,
    profile: Option<ScaleProfile>,
    transcoder: Arc<dyn TranscodePort>,
    cancel: CancelFlag,
    pending: VecDeque<ExecutionEvent>,
    phase: RunPhase,
    succeeded: usize,
    outputs: Vec<PathBuf>,
}

impl JobRun {
    fn new(
        job: &Job,
        plan: SegmentPlan,
        profile: Option<ScaleProfile>,
        transcoder: Arc<dyn TranscodePort>,
        cancel: CancelFlag,
    ) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(ExecutionEvent::message(format!(
            "Starting to cut video: {}",
            display_name(&job.input)
        )));
        pending.push_back(ExecutionEvent::message(format!(
            "Timestamps: {}",
            job.timestamps.join(", ")
        )));
        pending.push_back(ExecutionEvent::message(match &profile {
            Some(profile) => format!(
                "Scaling to {}x{} ({} video, {} audio); segments will be re-encoded, this takes longer",
                profile.width, profile.height, profile.video_bitrate, profile.audio_bitrate
            ),
            None => "Fast mode: copying streams without re-encoding".to_string(),
        }));
        pending.push_back(ExecutionEvent::message(match &job.output_dir {
            Some(dir) => format!("Output directory: {}", dir.display()),
            None => "Output directory: current directory".to_string(),
        }));

        Self {
            job: job.clone(),
            segments: plan.segments,
            profile,
            transcoder,
            cancel,
            pending,
            phase: RunPhase::Start(0),
            succeeded: 0,
            outputs: Vec::new(),
        }
    }

    /// Number of segments the run will attempt
    pub fn planned(&self) -> usize {
        self.segments.len()
    }

    pub fn mode(&self) -> TranscodeMode {
        TranscodeMode::for_profile(self.profile.as_ref())
    }

    /// Advance the run; `None` once the completion event has been returned
    pub async fn next_event(&mut self) -> Option<ExecutionEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            match std::mem::replace(&mut self.phase, RunPhase::Done) {
                RunPhase::Start(position) if position >= self.segments.len() => {
                    self.phase = RunPhase::Finish { cancelled: false };
                }
                RunPhase::Start(position) => {
                    if self.cancel.is_cancelled() {
                        info!(
                            remaining = self.segments.len() - position,
                            "Cancellation requested; skipping remaining segments"
                        );
                        self.pending.push_back(ExecutionEvent::message(format!(
                            "Cancelled before segment {} of {}",
                            position + 1,
                            self.segments.len()
                        )));
                        self.phase = RunPhase::Finish { cancelled: true };
                        continue;
                    }

                    let output = SafeFileNamer::unique_path(
                        &self.job.output_path_for(&self.segments[position].file_name),
                    );
                    let event = self.start_event(position, &output);
                    self.phase = RunPhase::Invoke { position, output };
                    return Some(event);
                }
                RunPhase::Invoke { position, output } => {
                    let event = self.execute_segment(position, output).await;
                    self.phase = RunPhase::Start(position + 1);
                    return Some(event);
                }
                RunPhase::Finish { cancelled } => {
                    info!(
                        succeeded = self.succeeded,
                        planned = self.segments.len(),
                        cancelled,
                        "Job finished"
                    );
                    return Some(ExecutionEvent::Complete {
                        succeeded: self.succeeded,
                        planned: self.segments.len(),
                        outputs: std::mem::take(&mut self.outputs),
                        cancelled,
                    });
                }
                RunPhase::Done => return None,
            }
        }
    }

    /// Drive the run to completion, collecting every event
    pub async fn collect_events(mut self) -> Vec<ExecutionEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    /// Run on a background task and relay events in order over a bounded channel
    ///
    /// Dropping the receiver stops the run at the next event.
    pub fn into_channel(mut self, capacity: usize) -> mpsc::Receiver<ExecutionEvent> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(async move {
            while let Some(event) = self.next_event().await {
                if tx.send(event).await.is_err() {
                    debug!("Event receiver dropped; stopping run");
                    break;
                }
            }
        });
        rx
    }

    fn start_event(&self, position: usize, output: &Path) -> ExecutionEvent {
        let segment = &self.segments[position];
        let mode = self.mode();
        let verb = match mode {
            TranscodeMode::FastCopy => "Fast copying",
            TranscodeMode::Scaling => "Scaling",
        };
        let which = if segment.is_final() { "final segment" } else { "segment" };

        ExecutionEvent::Progress {
            segment: Some(segment.index),
            mode: Some(mode),
            message: format!(
                "{} {} {} of {} ({}) into {}",
                verb,
                which,
                segment.index,
                self.segments.len(),
                segment.range_label(),
                output.display()
            ),
        }
    }

    async fn execute_segment(&mut self, position: usize, output: PathBuf) -> ExecutionEvent {
        let segment = &self.segments[position];
        let index = segment.index;
        let command =
            TranscodeCommandBuilder::build(segment, self.profile.as_ref(), &self.job.input, &output);
        debug!(segment = index, command = %command, "Invoking transcoder");

        let started = Instant::now();
        let failure = match self.transcoder.transcode(&command).await {
            Ok(result) if result.success => {
                info!(
                    segment = index,
                    output = %output.display(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Segment created"
                );
                self.succeeded += 1;
                self.outputs.push(output.clone());
                return ExecutionEvent::SegmentSucceeded {
                    segment: index,
                    path: output,
                };
            }
            Ok(result) => FailureClassifier::process_failure(result.exit_code, &result.stderr),
            Err(err) => SegmentFailure::Unexpected {
                message: err.to_string(),
            },
        };

        warn!(segment = index, output = %output.display(), error = %failure, "Segment failed");
        ExecutionEvent::SegmentFailed {
            segment: index,
            path: output,
            error: failure,
        }
    }
}
