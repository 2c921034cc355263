// Domain models - Core types and data structures

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::errors::{DomainError, SegmentFailure};

/// Default prefix for output segment filenames
pub const DEFAULT_OUTPUT_PREFIX: &str = "output";

/// Whole-second, non-negative position in the media timeline
///
/// Displays as zero-padded `HH:MM:SS`. Ordering is by value, which matches
/// lexicographic ordering of the canonical form below 100 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    total_seconds: u64,
}

impl Timestamp {
    /// Start of media
    pub const ZERO: Timestamp = Timestamp { total_seconds: 0 };

    /// Create from a total number of seconds
    pub fn from_seconds(total_seconds: u64) -> Self {
        Self { total_seconds }
    }

    /// Create from hours, minutes, seconds; fields are not range checked
    pub fn from_components(hours: u64, minutes: u64, seconds: u64) -> Option<Self> {
        hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)
            .map(Self::from_seconds)
    }

    /// Parse `SS`, `MM:SS` or `HH:MM:SS` into a canonical timestamp
    ///
    /// Fields are read right to left. Values past 59 carry into the next
    /// unit, so `"90"` and `"0:90"` both become `00:01:30`.
    pub fn normalize(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let invalid = || DomainError::InvalidTimestampFormat {
            raw: raw.to_string(),
        };

        let fields = trimmed
            .split(':')
            .map(|field| field.trim().parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        let parsed = match fields.as_slice() {
            [seconds] => Self::from_components(0, 0, *seconds),
            [minutes, seconds] => Self::from_components(0, *minutes, *seconds),
            [hours, minutes, seconds] => Self::from_components(*hours, *minutes, *seconds),
            _ => None,
        };

        parsed.ok_or_else(invalid)
    }

    pub fn as_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn hours(&self) -> u64 {
        self.total_seconds / 3600
    }

    pub fn minutes(&self) -> u64 {
        (self.total_seconds % 3600) / 60
    }

    pub fn seconds(&self) -> u64 {
        self.total_seconds % 60
    }

    /// Distance from `earlier` to `self`, zero when `earlier` is later
    pub fn saturating_sub(&self, earlier: Timestamp) -> Timestamp {
        Self::from_seconds(self.total_seconds.saturating_sub(earlier.total_seconds))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Target resolution and bitrates for re-encode mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleProfile {
    pub width: u32,
    pub height: u32,
    pub video_bitrate: String,
    pub audio_bitrate: String,
}

impl ScaleProfile {
    pub fn new(
        width: u32,
        height: u32,
        video_bitrate: impl Into<String>,
        audio_bitrate: impl Into<String>,
    ) -> Self {
        Self {
            width,
            height,
            video_bitrate: video_bitrate.into(),
            audio_bitrate: audio_bitrate.into(),
        }
    }

    /// Value for the video scale filter
    pub fn scale_filter(&self) -> String {
        format!("scale={}:{}", self.width, self.height)
    }
}

/// How a segment is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscodeMode {
    /// Stream copy, no re-encoding
    FastCopy,
    /// Decode, scale and re-encode
    Scaling,
}

impl TranscodeMode {
    /// Mode is decided by profile presence alone
    pub fn for_profile(profile: Option<&ScaleProfile>) -> Self {
        match profile {
            Some(_) => TranscodeMode::Scaling,
            None => TranscodeMode::FastCopy,
        }
    }
}

impl fmt::Display for TranscodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscodeMode::FastCopy => write!(f, "fast copy"),
            TranscodeMode::Scaling => write!(f, "scaling"),
        }
    }
}

/// One planned output segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSpec {
    /// 1-based position in the plan
    pub index: usize,
    pub start: Timestamp,
    /// `None` runs through the end of the media
    pub end: Option<Timestamp>,
    /// `{prefix}_segment_{index}.{ext}` before uniqueness adjustment
    pub file_name: String,
}

impl SegmentSpec {
    /// Human-readable range, e.g. `00:00:10 -> end`
    pub fn range_label(&self) -> String {
        match self.end {
            Some(end) => format!("{} -> {}", self.start, end),
            None => format!("{} -> end", self.start),
        }
    }

    pub fn is_final(&self) -> bool {
        self.end.is_none()
    }
}

/// A request to split one media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub timestamps: Vec<String>,
    pub output_prefix: String,
    pub output_dir: Option<PathBuf>,
    pub scale: Option<String>,
}

impl Job {
    /// Create a job with the default prefix, no output directory and no scaling
    pub fn new<I, S>(input: impl Into<PathBuf>, timestamps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into(),
            timestamps: timestamps.into_iter().map(Into::into).collect(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            output_dir: None,
            scale: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_scale(mut self, scale: impl Into<String>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    /// Extension of the input file, used for every output segment
    pub fn source_extension(&self) -> Option<String> {
        self.input
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .filter(|ext| !ext.is_empty())
    }

    /// Directory the job writes into; current directory when none is configured
    pub fn effective_output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Output path for a file name, before uniqueness adjustment
    pub fn output_path_for(&self, file_name: &str) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Something that happened while running a job, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
    /// Informational message; segment start messages carry index and mode
    Progress {
        segment: Option<usize>,
        mode: Option<TranscodeMode>,
        message: String,
    },
    SegmentSucceeded {
        segment: usize,
        path: PathBuf,
    },
    SegmentFailed {
        segment: usize,
        path: PathBuf,
        error: SegmentFailure,
    },
    /// Always the last event of a run
    Complete {
        succeeded: usize,
        planned: usize,
        outputs: Vec<PathBuf>,
        cancelled: bool,
    },
}

impl ExecutionEvent {
    pub fn message(message: impl Into<String>) -> Self {
        ExecutionEvent::Progress {
            segment: None,
            mode: None,
            message: message.into(),
        }
    }
}

/// What the probe learned about the input
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaSummary {
    /// Whole seconds, rounded down
    pub duration: Option<Timestamp>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Raw rational, e.g. `30000/1001`
    pub frame_rate: Option<String>,
}
