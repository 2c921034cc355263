//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::ports::ConfigPort;
use crate::utils::logging::{LogFormat, LogLevel};

/// Config files tried, in order, when `--config` is not given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["segcut.toml", "config/segcut.toml"];

/// Prefix for environment overrides, e.g. `SEGCUT_FFMPEG_PATH`
pub const ENV_PREFIX: &str = "SEGCUT_";

const CONFIG_KEYS: [&str; 7] = [
    "ffmpeg_path",
    "ffprobe_path",
    "output_prefix",
    "log_level",
    "log_format",
    "segment_timeout_secs",
    "event_buffer",
];

/// Values supplied on the command line; `None` leaves lower layers in charge
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub output_prefix: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub segment_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(path) = &self.ffmpeg_path {
            pairs.push(("ffmpeg_path", path.to_string_lossy().to_string()));
        }
        if let Some(path) = &self.ffprobe_path {
            pairs.push(("ffprobe_path", path.to_string_lossy().to_string()));
        }
        if let Some(prefix) = &self.output_prefix {
            pairs.push(("output_prefix", prefix.clone()));
        }
        if let Some(level) = &self.log_level {
            pairs.push(("log_level", level.clone()));
        }
        if let Some(format) = &self.log_format {
            pairs.push(("log_format", format.clone()));
        }
        if let Some(secs) = self.segment_timeout_secs {
            pairs.push(("segment_timeout_secs", secs.to_string()));
        }
        pairs
    }
}

/// Fully resolved, validated settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub output_prefix: String,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// `None` lets a transcode run for as long as it needs
    pub segment_timeout: Option<Duration>,
    pub event_buffer: usize,
    /// File the settings were read from, if any
    pub config_file: Option<PathBuf>,
}

impl RuntimeSettings {
    /// Read and validate every key from a populated config store
    pub async fn from_config(
        config: &dyn ConfigPort,
        config_file: Option<PathBuf>,
    ) -> Result<Self, DomainError> {
        let log_level = config
            .get_config_or_default("log_level", "info")
            .await?
            .parse::<LogLevel>()
            .map_err(DomainError::Config)?;
        let log_format = config
            .get_config_or_default("log_format", "pretty")
            .await?
            .parse::<LogFormat>()
            .map_err(DomainError::Config)?;

        let timeout_secs: u64 = parse_number(
            "segment_timeout_secs",
            &config
                .get_config_or_default("segment_timeout_secs", "0")
                .await?,
        )?;
        let event_buffer: usize = parse_number(
            "event_buffer",
            &config.get_config_or_default("event_buffer", "16").await?,
        )?;
        if event_buffer == 0 {
            return Err(DomainError::Config("event_buffer must be at least 1".to_string()));
        }

        let output_prefix = config
            .get_config_or_default("output_prefix", crate::domain::model::DEFAULT_OUTPUT_PREFIX)
            .await?;
        if output_prefix.trim().is_empty() {
            return Err(DomainError::Config("output_prefix must not be empty".to_string()));
        }

        Ok(Self {
            ffmpeg_path: PathBuf::from(config.get_config_or_default("ffmpeg_path", "ffmpeg").await?),
            ffprobe_path: PathBuf::from(
                config.get_config_or_default("ffprobe_path", "ffprobe").await?,
            ),
            output_prefix,
            log_level,
            log_format,
            segment_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            event_buffer,
            config_file,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, DomainError> {
    raw.trim().parse::<T>().map_err(|_| {
        DomainError::Config(format!(
            "{} must be a non-negative integer, got '{}'",
            key, raw
        ))
    })
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(
    config: &dyn ConfigPort,
    overrides: &ConfigOverrides,
) -> Result<RuntimeSettings> {
    // Defaults are seeded by the adapter itself
    let config_file = load_config_file(config, overrides.config_file.as_deref()).await?;

    load_environment_variables(config, |name| std::env::var(name).ok()).await?;

    for (key, value) in overrides.pairs() {
        debug!("CLI override: {} = {}", key, value);
        config.set_config(key, &value).await?;
    }

    debug!(keys = ?config.get_all_config_keys().await?, "Configuration keys resolved");

    RuntimeSettings::from_config(config, config_file)
        .await
        .context("Invalid configuration")
}

/// Load the explicit config file, or the first default path that exists
async fn load_config_file(config: &dyn ConfigPort, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        config
            .load_config(path)
            .await
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        return Ok(Some(path.to_path_buf()));
    }

    for candidate in DEFAULT_CONFIG_PATHS {
        let path = Path::new(candidate);
        if path.is_file() {
            config.load_config(path).await?;
            return Ok(Some(path.to_path_buf()));
        }
    }

    Ok(None)
}

/// Apply `SEGCUT_<KEY>` overrides using the supplied variable lookup
async fn load_environment_variables<F>(config: &dyn ConfigPort, lookup: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;
    for key in CONFIG_KEYS {
        let name = format!("{}{}", ENV_PREFIX, key.to_uppercase());
        if let Some(value) = lookup(&name) {
            debug!("Environment override: {} = {}", name, value);
            config.set_config(key, &value).await?;
            env_overrides += 1;
        }
    }
    Ok(env_overrides)
}
