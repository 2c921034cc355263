//! Command-line argument definitions

use clap::Args;
use clap_num::number_range;
use std::path::{Path, PathBuf};

use crate::domain::model::Job;

/// Longest per-segment timeout accepted on the command line (one day)
const MAX_SEGMENT_TIMEOUT_SECS: u64 = 86_400;

fn segment_timeout(s: &str) -> Result<u64, String> {
    number_range(s, 1, MAX_SEGMENT_TIMEOUT_SECS)
}

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Timestamps where to cut (HH:MM:SS, MM:SS, or SS)
    #[arg(short, long = "timestamps", num_args = 1.., required = true)]
    pub timestamps: Vec<String>,

    /// Prefix for output file names (default: output)
    #[arg(short = 'o', long)]
    pub output_prefix: Option<String>,

    /// Scale preset (720p, 480p, 360p, 240p) or width:height[:bitrate]
    #[arg(short, long)]
    pub scale: Option<String>,

    /// Output directory for segments (default: current directory)
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Kill an ffmpeg run that takes longer than this many seconds
    #[arg(long, value_parser = segment_timeout)]
    pub segment_timeout: Option<u64>,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Timestamps where to cut (HH:MM:SS, MM:SS, or SS)
    #[arg(short, long = "timestamps", num_args = 1.., required = true)]
    pub timestamps: Vec<String>,

    /// Prefix for output file names (default: output)
    #[arg(short = 'o', long)]
    pub output_prefix: Option<String>,

    /// Scale preset (720p, 480p, 360p, 240p) or width:height[:bitrate]
    #[arg(short, long)]
    pub scale: Option<String>,

    /// Output directory for segments (default: current directory)
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

fn build_job(
    input: &Path,
    timestamps: &[String],
    prefix: &str,
    scale: Option<&str>,
    output_dir: Option<&Path>,
) -> Job {
    let mut job = Job::new(input, timestamps.iter().cloned()).with_prefix(prefix);
    if let Some(scale) = scale {
        job = job.with_scale(scale);
    }
    if let Some(dir) = output_dir {
        job = job.with_output_dir(dir);
    }
    job
}

impl SplitArgs {
    /// Build the job; `prefix` is the resolved output prefix
    pub fn to_job(&self, prefix: &str) -> Job {
        build_job(
            &self.input,
            &self.timestamps,
            prefix,
            self.scale.as_deref(),
            self.output_dir.as_deref(),
        )
    }
}

impl PreviewArgs {
    pub fn to_job(&self, prefix: &str) -> Job {
        build_job(
            &self.input,
            &self.timestamps,
            prefix,
            self.scale.as_deref(),
            self.output_dir.as_deref(),
        )
    }
}
