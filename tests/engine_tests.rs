//! Engine tests against an in-memory transcoder

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use segcut_cli::adapters::LocalFsAdapter;
use segcut_cli::domain::errors::{DomainError, FailureReason, SegmentFailure};
use segcut_cli::domain::model::{ExecutionEvent, Job, TranscodeMode};
use segcut_cli::engine::{CancelFlag, ExecutionCoordinator, TranscodeCommand};
use segcut_cli::ports::{TranscodeOutput, TranscodePort};

// Test utilities

enum Scripted {
    Fail(&'static str),
    SpawnError,
}

/// Records every command and touches the output file on success
#[derive(Default)]
struct FakeTranscoder {
    commands: Mutex<Vec<TranscodeCommand>>,
    /// Keyed by 1-based call number
    script: HashMap<usize, Scripted>,
}

impl FakeTranscoder {
    fn failing_on(call: usize, stderr: &'static str) -> Self {
        Self {
            script: HashMap::from([(call, Scripted::Fail(stderr))]),
            ..Default::default()
        }
    }

    fn erroring_on(call: usize) -> Self {
        Self {
            script: HashMap::from([(call, Scripted::SpawnError)]),
            ..Default::default()
        }
    }

    fn commands(&self) -> Vec<TranscodeCommand> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscodePort for FakeTranscoder {
    async fn check_available(&self) -> Result<String, DomainError> {
        Ok("fake transcoder".to_string())
    }

    async fn transcode(&self, command: &TranscodeCommand) -> Result<TranscodeOutput, DomainError> {
        let call = {
            let mut commands = self.commands.lock().unwrap();
            commands.push(command.clone());
            commands.len()
        };

        match self.script.get(&call) {
            Some(Scripted::Fail(stderr)) => Ok(TranscodeOutput::failed(Some(1), *stderr)),
            Some(Scripted::SpawnError) => Err(DomainError::Internal("spawn failed".to_string())),
            None => {
                std::fs::write(&command.output, b"segment")?;
                Ok(TranscodeOutput::succeeded())
            }
        }
    }
}

struct Fixture {
    dir: TempDir,
    input: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.mp4");
        std::fs::write(&input, b"fake video data").unwrap();
        Self { dir, input }
    }

    fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn job<const N: usize>(&self, timestamps: [&str; N]) -> Job {
        Job::new(&self.input, timestamps).with_output_dir(self.out_dir())
    }
}

fn coordinator(transcoder: &Arc<FakeTranscoder>) -> ExecutionCoordinator {
    ExecutionCoordinator::new(
        Arc::clone(transcoder) as Arc<dyn TranscodePort>,
        Arc::new(LocalFsAdapter::new()),
    )
}

fn completion(events: &[ExecutionEvent]) -> (usize, usize, Vec<PathBuf>, bool) {
    match events.last() {
        Some(ExecutionEvent::Complete {
            succeeded,
            planned,
            outputs,
            cancelled,
        }) => (*succeeded, *planned, outputs.clone(), *cancelled),
        other => panic!("expected completion last, got {:?}", other),
    }
}

fn kind(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::Progress { segment: None, .. } => "note".to_string(),
        ExecutionEvent::Progress {
            segment: Some(i), ..
        } => format!("start {}", i),
        ExecutionEvent::SegmentSucceeded { segment, .. } => format!("ok {}", segment),
        ExecutionEvent::SegmentFailed { segment, .. } => format!("failed {}", segment),
        ExecutionEvent::Complete { .. } => "complete".to_string(),
    }
}

// Execution

#[tokio::test]
async fn test_events_follow_segment_order() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());

    let run = coordinator(&transcoder)
        .run(&fixture.job(["3:00", "1:30"]), CancelFlag::new())
        .await
        .unwrap();
    assert_eq!(run.planned(), 3);
    let events = run.collect_events().await;

    let kinds: Vec<String> = events.iter().map(kind).collect();
    assert_eq!(
        kinds,
        vec![
            "note", "note", "note", "note", "start 1", "ok 1", "start 2", "ok 2", "start 3",
            "ok 3", "complete"
        ]
    );

    let (succeeded, planned, outputs, cancelled) = completion(&events);
    assert_eq!((succeeded, planned, cancelled), (3, 3, false));
    assert_eq!(
        outputs,
        (1..=3)
            .map(|i| fixture.out_dir().join(format!("output_segment_{}.mp4", i)))
            .collect::<Vec<_>>()
    );
    assert!(outputs.iter().all(|path| path.is_file()));
}

#[tokio::test]
async fn test_commands_cover_contiguous_ranges() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());

    coordinator(&transcoder)
        .run(&fixture.job(["1:30", "90", "0:10"]), CancelFlag::new())
        .await
        .unwrap()
        .collect_events()
        .await;

    let commands = transcoder.commands();
    assert_eq!(commands.len(), 3);

    let range = |command: &TranscodeCommand| {
        let value = |flag: &str| {
            command
                .args
                .iter()
                .position(|arg| arg == flag)
                .map(|i| command.args[i + 1].clone())
        };
        (value("-ss"), value("-to"))
    };
    assert_eq!(
        range(&commands[0]),
        (Some("00:00:00".to_string()), Some("00:00:10".to_string()))
    );
    assert_eq!(
        range(&commands[1]),
        (Some("00:00:10".to_string()), Some("00:01:30".to_string()))
    );
    assert_eq!(range(&commands[2]), (Some("00:01:30".to_string()), None));
    assert!(commands.iter().all(|command| command.copies_codecs()));
    assert!(commands.iter().all(|command| command.mode == TranscodeMode::FastCopy));
}

#[tokio::test]
async fn test_scaling_job_re_encodes_every_segment() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());

    let events = coordinator(&transcoder)
        .run(&fixture.job(["0:30"]).with_scale("480p"), CancelFlag::new())
        .await
        .unwrap()
        .collect_events()
        .await;

    for command in transcoder.commands() {
        assert_eq!(command.scale_filter_count(), 1);
        assert!(!command.copies_codecs());
        assert!(command.args.contains(&"scale=854:480".to_string()));
    }
    assert!(events.iter().any(|event| matches!(
        event,
        ExecutionEvent::Progress {
            mode: Some(TranscodeMode::Scaling),
            ..
        }
    )));
}

#[tokio::test]
async fn test_failed_segment_does_not_stop_the_run() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::failing_on(
        2,
        "out/output_segment_2.mp4: Permission denied\n",
    ));

    let events = coordinator(&transcoder)
        .run(&fixture.job(["1:00", "2:00"]), CancelFlag::new())
        .await
        .unwrap()
        .collect_events()
        .await;

    assert_eq!(transcoder.commands().len(), 3);
    let failure = events
        .iter()
        .find_map(|event| match event {
            ExecutionEvent::SegmentFailed { segment, error, .. } => Some((*segment, error.clone())),
            _ => None,
        })
        .unwrap();
    assert_eq!(failure.0, 2);
    assert!(matches!(
        failure.1,
        SegmentFailure::Process {
            reason: FailureReason::PermissionDenied,
            exit_code: Some(1),
            ..
        }
    ));

    let (succeeded, planned, outputs, _) = completion(&events);
    assert_eq!((succeeded, planned), (2, 3));
    assert_eq!(
        outputs,
        vec![
            fixture.out_dir().join("output_segment_1.mp4"),
            fixture.out_dir().join("output_segment_3.mp4"),
        ]
    );
}

#[tokio::test]
async fn test_only_segment_failing_reports_zero_successes() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::failing_on(1, "Invalid data found"));

    let events = coordinator(&transcoder)
        .run(&fixture.job(["0"]), CancelFlag::new())
        .await
        .unwrap()
        .collect_events()
        .await;

    let (succeeded, planned, outputs, cancelled) = completion(&events);
    assert_eq!((succeeded, planned, cancelled), (0, 1, false));
    assert!(outputs.is_empty());
}

#[tokio::test]
async fn test_transcoder_error_is_unexpected_failure() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::erroring_on(1));

    let events = coordinator(&transcoder)
        .run(&fixture.job(["0:05"]), CancelFlag::new())
        .await
        .unwrap()
        .collect_events()
        .await;

    assert!(events.iter().any(|event| matches!(
        event,
        ExecutionEvent::SegmentFailed {
            segment: 1,
            error: SegmentFailure::Unexpected { .. },
            ..
        }
    )));
    assert_eq!(completion(&events).0, 1);
}

#[tokio::test]
async fn test_existing_outputs_are_never_overwritten() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());
    let job = fixture.job(["0:10"]);

    for _ in 0..2 {
        coordinator(&transcoder)
            .run(&job, CancelFlag::new())
            .await
            .unwrap()
            .collect_events()
            .await;
    }

    let outputs: Vec<PathBuf> = transcoder
        .commands()
        .into_iter()
        .map(|command| command.output)
        .collect();
    let names: Vec<String> = outputs
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "output_segment_1.mp4",
            "output_segment_2.mp4",
            "output_segment_1_1.mp4",
            "output_segment_2_1.mp4",
        ]
    );
}

#[tokio::test]
async fn test_channel_relay_preserves_order() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::failing_on(1, "boom"));

    let run = coordinator(&transcoder)
        .run(&fixture.job(["0:10", "0:20"]), CancelFlag::new())
        .await
        .unwrap();
    let mut rx = run.into_channel(1);

    let mut kinds = Vec::new();
    while let Some(event) = rx.recv().await {
        kinds.push(kind(&event));
    }
    assert_eq!(
        kinds,
        vec![
            "note", "note", "note", "note", "start 1", "failed 1", "start 2", "ok 2", "start 3",
            "ok 3", "complete"
        ]
    );
}

// Cancellation

#[tokio::test]
async fn test_cancel_before_first_segment() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());
    let cancel = CancelFlag::new();

    let run = coordinator(&transcoder)
        .run(&fixture.job(["0:10"]), cancel.clone())
        .await
        .unwrap();
    cancel.cancel();
    let events = run.collect_events().await;

    assert!(transcoder.commands().is_empty());
    let (succeeded, planned, _, cancelled) = completion(&events);
    assert_eq!((succeeded, planned, cancelled), (0, 2, true));
}

#[tokio::test]
async fn test_cancel_takes_effect_at_segment_boundary() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());
    let cancel = CancelFlag::new();

    let mut run = coordinator(&transcoder)
        .run(&fixture.job(["0:10", "0:20"]), cancel.clone())
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Some(event) = run.next_event().await {
        if matches!(event, ExecutionEvent::SegmentSucceeded { segment: 1, .. }) {
            cancel.cancel();
        }
        events.push(event);
    }

    assert_eq!(transcoder.commands().len(), 1);
    let (succeeded, planned, _, cancelled) = completion(&events);
    assert_eq!((succeeded, planned, cancelled), (1, 3, true));
    assert!(run.next_event().await.is_none());
}

// Validation and preflight

#[tokio::test]
async fn test_missing_input_fails_before_any_event() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());
    let job = Job::new(fixture.dir.path().join("nope.mp4"), ["0:10"]);

    let result = coordinator(&transcoder).run(&job, CancelFlag::new()).await;
    assert!(matches!(result, Err(DomainError::InputNotFound { .. })));
}

#[tokio::test]
async fn test_invalid_timestamps_fail_before_any_event() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());

    let result = coordinator(&transcoder)
        .run(&fixture.job(["1:30", "abc"]), CancelFlag::new())
        .await;
    assert!(matches!(
        result,
        Err(DomainError::InvalidTimestampFormat { .. })
    ));

    let result = coordinator(&transcoder)
        .run(&fixture.job([]), CancelFlag::new())
        .await;
    assert!(matches!(result, Err(DomainError::NoTimestamps)));
    assert!(!fixture.out_dir().exists());
}

#[tokio::test]
async fn test_invalid_scale_fails_before_any_event() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());

    let result = coordinator(&transcoder)
        .run(&fixture.job(["0:10"]).with_scale("4k"), CancelFlag::new())
        .await;
    assert!(matches!(result, Err(DomainError::InvalidScaleFormat { .. })));
}

#[tokio::test]
async fn test_unwritable_output_dir_is_permission_denied() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());
    std::fs::write(fixture.out_dir(), b"not a directory").unwrap();

    let result = coordinator(&transcoder)
        .run(&fixture.job(["0:10"]), CancelFlag::new())
        .await;
    assert!(matches!(result, Err(DomainError::PermissionDenied { .. })));
    assert!(transcoder.commands().is_empty());
}

#[tokio::test]
async fn test_output_dir_is_created() {
    let fixture = Fixture::new();
    let transcoder = Arc::new(FakeTranscoder::default());
    let job = Job::new(&fixture.input, ["0:10"]).with_output_dir(fixture.dir.path().join("a/b"));

    coordinator(&transcoder)
        .run(&job, CancelFlag::new())
        .await
        .unwrap();
    assert!(fixture.dir.path().join("a/b").is_dir());
}
