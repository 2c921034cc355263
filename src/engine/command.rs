//! Transcoder argument construction

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::model::{ScaleProfile, SegmentSpec, TranscodeMode};

pub const FLAG_INPUT: &str = "-i";
pub const FLAG_START: &str = "-ss";
pub const FLAG_END: &str = "-to";
pub const FLAG_CODEC: &str = "-c";
pub const FLAG_OVERWRITE: &str = "-y";
pub const FLAG_NEGATIVE_TS: &str = "-avoid_negative_ts";
pub const FLAG_VIDEO_FILTER: &str = "-vf";
pub const FLAG_VIDEO_BITRATE: &str = "-b:v";
pub const FLAG_AUDIO_BITRATE: &str = "-b:a";

/// Argument vector for one segment, without the program name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscodeCommand {
    pub mode: TranscodeMode,
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl TranscodeCommand {
    /// Number of video scale filter arguments present
    pub fn scale_filter_count(&self) -> usize {
        self.args
            .windows(2)
            .filter(|pair| pair[0] == FLAG_VIDEO_FILTER && pair[1].starts_with("scale="))
            .count()
    }

    /// Whether the command copies codecs instead of re-encoding
    pub fn copies_codecs(&self) -> bool {
        self.args
            .windows(2)
            .any(|pair| pair[0] == FLAG_CODEC && pair[1] == "copy")
    }
}

impl fmt::Display for TranscodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(' ') {
                    format!("\"{}\"", arg)
                } else {
                    arg.clone()
                }
            })
            .collect();
        f.write_str(&quoted.join(" "))
    }
}

/// Builds transcoder invocations for planned segments
pub struct TranscodeCommandBuilder;

impl TranscodeCommandBuilder {
    /// Build the command for one segment
    ///
    /// Profile absent selects stream copy; profile present selects re-encode
    /// with exactly one scale filter.
    pub fn build(
        segment: &SegmentSpec,
        profile: Option<&ScaleProfile>,
        input: &Path,
        output: &Path,
    ) -> TranscodeCommand {
        let mut args = vec![
            FLAG_INPUT.to_string(),
            input.to_string_lossy().to_string(),
            FLAG_START.to_string(),
            segment.start.to_string(),
        ];
        if let Some(end) = segment.end {
            args.push(FLAG_END.to_string());
            args.push(end.to_string());
        }

        match profile {
            None => {
                args.extend(
                    [FLAG_CODEC, "copy", FLAG_NEGATIVE_TS, "make_zero", FLAG_OVERWRITE]
                        .map(String::from),
                );
            }
            Some(profile) => {
                args.extend([FLAG_NEGATIVE_TS, "make_zero", FLAG_OVERWRITE].map(String::from));
                args.push(FLAG_VIDEO_FILTER.to_string());
                args.push(profile.scale_filter());
                args.push(FLAG_VIDEO_BITRATE.to_string());
                args.push(profile.video_bitrate.clone());
                args.push(FLAG_AUDIO_BITRATE.to_string());
                args.push(profile.audio_bitrate.clone());
            }
        }
        args.push(output.to_string_lossy().to_string());

        TranscodeCommand {
            mode: TranscodeMode::for_profile(profile),
            args,
            output: output.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Timestamp;

    fn segment(end: Option<u64>) -> SegmentSpec {
        SegmentSpec {
            index: 1,
            start: Timestamp::from_seconds(10),
            end: end.map(Timestamp::from_seconds),
            file_name: "output_segment_1.mp4".to_string(),
        }
    }

    #[test]
    fn test_copy_mode_with_end() {
        let command = TranscodeCommandBuilder::build(
            &segment(Some(90)),
            None,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
        );

        assert_eq!(
            command.args,
            vec![
                "-i", "in.mp4", "-ss", "00:00:10", "-to", "00:01:30", "-c", "copy",
                "-avoid_negative_ts", "make_zero", "-y", "out.mp4"
            ]
        );
        assert_eq!(command.mode, TranscodeMode::FastCopy);
        assert_eq!(command.scale_filter_count(), 0);
        assert!(command.copies_codecs());
    }

    #[test]
    fn test_copy_mode_final_segment_has_no_end() {
        let command = TranscodeCommandBuilder::build(
            &segment(None),
            None,
            Path::new("in.mp4"),
            Path::new("out.mp4"),
        );
        assert!(!command.args.iter().any(|arg| arg == FLAG_END));
        assert_eq!(command.args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn test_scaling_mode() {
        let profile = ScaleProfile::new(1280, 720, "1.5M", "128k");
        let command = TranscodeCommandBuilder::build(
            &segment(Some(90)),
            Some(&profile),
            Path::new("in.mp4"),
            Path::new("out.mp4"),
        );

        assert_eq!(
            command.args,
            vec![
                "-i", "in.mp4", "-ss", "00:00:10", "-to", "00:01:30",
                "-avoid_negative_ts", "make_zero", "-y", "-vf", "scale=1280:720", "-b:v", "1.5M",
                "-b:a", "128k", "out.mp4"
            ]
        );
        assert_eq!(command.mode, TranscodeMode::Scaling);
        assert_eq!(command.scale_filter_count(), 1);
        assert!(!command.copies_codecs());
    }

    #[test]
    fn test_display_quotes_spaces() {
        let command = TranscodeCommandBuilder::build(
            &segment(None),
            None,
            Path::new("my clip.mp4"),
            Path::new("out.mp4"),
        );
        assert!(command.to_string().starts_with("-i \"my clip.mp4\" -ss"));
    }
}
