//! segcut
//!
//! Cut a video into segments at given timestamps using FFmpeg.
//!
//! # Usage
//!
//! ```bash
//! segcut split input.mp4 -t 1:30 3:45 5:20
//! segcut split video.mp4 -t 2:00 4:00 -s 720p -d clips
//! segcut preview input.mp4 -t 1:30 3:45
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use segcut_cli::adapters::TomlConfigAdapter;
use segcut_cli::app::DefaultAppContainer;
use segcut_cli::cli::{commands, Cli, Commands};
use segcut_cli::config_initialization::initialize_configuration_hierarchy;
use segcut_cli::utils::logging::init_logging;

/// Main entry point for the segcut CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TomlConfigAdapter::new();
    let settings = initialize_configuration_hierarchy(&config, &cli.config_overrides()).await?;
    init_logging(settings.log_level, settings.log_format);
    info!(
        config_file = ?settings.config_file,
        ffmpeg = %settings.ffmpeg_path.display(),
        "Configuration loaded"
    );

    let container = DefaultAppContainer::new(&settings);

    match cli.command {
        Commands::Split(args) => {
            let outcome = commands::split(&container, &settings, args).await?;
            if outcome.succeeded == 0 {
                error!(planned = outcome.planned, "No segments were created");
                std::process::exit(1);
            }
        }
        Commands::Preview(args) => {
            commands::preview(&container, &settings, args).await?;
        }
    }

    Ok(())
}
