// Domain rules - Business logic and policies

use crate::domain::errors::*;
use crate::domain::model::*;

/// Audio bitrate for every re-encode, preset or custom
pub const AUDIO_BITRATE: &str = "128k";

/// Video bitrate used when a custom selector omits one
pub const DEFAULT_VIDEO_BITRATE: &str = "1M";

/// Named presets: (name, width, height, video bitrate)
const PRESETS: [(&str, u32, u32, &str); 4] = [
    ("720p", 1280, 720, "2M"),
    ("480p", 854, 480, "1M"),
    ("360p", 640, 360, "500k"),
    ("240p", 426, 240, "250k"),
];

/// Resolves a scale selector into a re-encode profile
pub struct ScaleProfileResolver;

impl ScaleProfileResolver {
    /// Names accepted as presets
    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, ..)| *name)
    }

    /// Resolve a selector; `Ok(None)` selects stream-copy mode
    ///
    /// Accepts a preset name (case-insensitive) or `width:height[:bitrate]`.
    pub fn resolve(selector: Option<&str>) -> Result<Option<ScaleProfile>, DomainError> {
        let Some(raw) = selector else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let lowered = trimmed.to_lowercase();
        if let Some((_, width, height, video)) =
            PRESETS.iter().find(|(name, ..)| *name == lowered)
        {
            return Ok(Some(ScaleProfile::new(*width, *height, *video, AUDIO_BITRATE)));
        }

        Self::parse_custom(trimmed)
            .map(Some)
            .ok_or_else(|| DomainError::InvalidScaleFormat {
                raw: raw.to_string(),
            })
    }

    fn parse_custom(selector: &str) -> Option<ScaleProfile> {
        let parts: Vec<&str> = selector.split(':').map(str::trim).collect();
        let (width, height, bitrate) = match parts.as_slice() {
            [width, height] => (*width, *height, ""),
            [width, height, bitrate] => (*width, *height, *bitrate),
            _ => return None,
        };

        let width = width.parse::<u32>().ok().filter(|w| *w > 0)?;
        let height = height.parse::<u32>().ok().filter(|h| *h > 0)?;
        let bitrate = if bitrate.is_empty() {
            DEFAULT_VIDEO_BITRATE
        } else {
            bitrate
        };

        Some(ScaleProfile::new(width, height, bitrate, AUDIO_BITRATE))
    }
}

/// Guesses a failure cause from transcoder stderr
///
/// Advisory only: anything unrecognized is `FailureReason::Other`.
pub struct FailureClassifier;

impl FailureClassifier {
    pub fn classify(stderr: &str) -> FailureReason {
        let lowered = stderr.to_lowercase();
        if lowered.contains("permission denied") {
            FailureReason::PermissionDenied
        } else if lowered.contains("no such file or directory") {
            FailureReason::MissingFile
        } else if lowered.contains("invalid argument") {
            FailureReason::InvalidArgument
        } else {
            FailureReason::Other
        }
    }

    /// Build the per-segment failure for a non-zero exit
    pub fn process_failure(exit_code: Option<i32>, stderr: &str) -> SegmentFailure {
        let stderr = stderr.trim();
        SegmentFailure::Process {
            reason: Self::classify(stderr),
            exit_code,
            stderr: stderr.to_string(),
        }
    }
}
