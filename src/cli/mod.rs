//! CLI module for segcut
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config_initialization::ConfigOverrides;

pub mod args;
pub mod commands;

pub use args::{PreviewArgs, SplitArgs};

/// segcut - cut a video into segments at the given timestamps
///
/// Segments are stream-copied by default, or re-encoded when a scale
/// preset or custom `width:height[:bitrate]` is given.
#[derive(Parser, Debug)]
#[command(name = "segcut")]
#[command(about = "Cut a video into segments at the given timestamps using FFmpeg")]
#[command(version)]
#[command(after_help = "Examples:
  segcut split input.mp4 -t 1:30 3:45 5:20
  segcut split video.mp4 -t 00:01:30 00:03:45 -o scene
  segcut split movie.avi -t 90 225 320
  segcut split video.mp4 -t 2:00 4:00 -s 720p
  segcut split input.mp4 -t 1:30 -s 1280:720:1.5M
  segcut preview input.mp4 -t 1:30 3:45")]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Configuration file (default: segcut.toml, then config/segcut.toml)
    #[arg(long, global = true, env = "SEGCUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the ffmpeg binary
    #[arg(long, global = true)]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long, global = true)]
    pub ffprobe: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cut a video into segments
    Split(SplitArgs),
    /// Show the segments a split would produce, without running ffmpeg
    Preview(PreviewArgs),
}

impl Cli {
    /// Command-line layer of the configuration hierarchy
    pub fn config_overrides(&self) -> ConfigOverrides {
        let (output_prefix, segment_timeout_secs) = match &self.command {
            Commands::Split(args) => (args.output_prefix.clone(), args.segment_timeout),
            Commands::Preview(args) => (args.output_prefix.clone(), None),
        };

        ConfigOverrides {
            config_file: self.config.clone(),
            ffmpeg_path: self.ffmpeg.clone(),
            ffprobe_path: self.ffprobe.clone(),
            output_prefix,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            segment_timeout_secs,
        }
    }
}
