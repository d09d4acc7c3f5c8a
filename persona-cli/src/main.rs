// persona command line interface
// Headless playback of emote cue scripts and config checking

mod script;
mod sim;

use anyhow::Context;
use clap::{Parser, Subcommand};
use persona_emote::{EmoteConfig, EmoteController};
use script::Script;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "persona")]
#[command(about = "Avatar emote arbitration - play cue scripts headless", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a cue script through the emote controller
    Simulate {
        /// Cue script (TOML)
        #[arg(long, short)]
        script: PathBuf,

        /// Emote configuration file (TOML)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Seconds to simulate (default: last cue + 3s)
        #[arg(long, short)]
        duration: Option<f32>,

        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,

        /// Print every frame, not only frames where the pose changes
        #[arg(long)]
        every_frame: bool,
    },

    /// Validate an emote configuration file
    CheckConfig {
        /// Configuration file path
        path: PathBuf,
    },

    /// Print the default configuration as TOML
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate { script, config, fps, duration, json, every_frame } => {
            simulate(script, config, fps, duration, json, every_frame)?;
        }
        Commands::CheckConfig { path } => {
            let config = EmoteConfig::from_file(&path)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            println!("✓ {} is valid", path.display());
            println!(
                "  blink every {:.1}-{:.1}s, emotions {:.1}s, gestures {:.1}s",
                config.blink.interval_min,
                config.blink.interval_max,
                config.emotion.default_duration,
                config.gesture.default_duration
            );
        }
        Commands::DefaultConfig => {
            print!("{}", toml::to_string_pretty(&EmoteConfig::default())?);
        }
    }

    Ok(())
}

fn simulate(
    script_path: PathBuf,
    config_path: Option<PathBuf>,
    fps: u32,
    duration: Option<f32>,
    json: bool,
    every_frame: bool,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => EmoteConfig::from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EmoteConfig::default(),
    };
    let script = Script::from_file(&script_path)?;
    let duration = duration.unwrap_or_else(|| script.end_time() + 3.0);
    if !duration.is_finite() || duration < 0.0 {
        anyhow::bail!("--duration must be a finite, non-negative number of seconds, got {}", duration);
    }

    info!(
        "Simulating {} cues for {:.2}s at {} fps",
        script.cues.len(),
        duration,
        fps
    );

    let mut emote = EmoteController::new(config)?;
    emote.bind_rig(Box::new(sim::TracingRig));

    let mut previous: Option<sim::FrameRecord> = None;
    let frames = sim::run(&mut emote, &script, fps, duration, |record| {
        if !every_frame && previous.as_ref().map_or(false, |p| sim::same_shape(p, &record)) {
            return Ok(());
        }
        if json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", sim::describe(&record));
        }
        previous = Some(record);
        Ok(())
    })?;

    info!(
        "Done: {} frames, {} blinks",
        frames,
        emote.expression().blink().blink_count()
    );
    Ok(())
}
