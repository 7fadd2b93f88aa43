use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use inertia_core::tunables::{SmoothnessPreset, SpeedPreset};
use inertia_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "inertia")]
#[command(author, version, about = "Momentum scrolling for discrete mouse wheels")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (default: ~/.config/inertia/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Grab wheel devices and run the scroll engine
    Run {
        /// evdev node to grab instead of auto-detecting (repeatable)
        #[arg(short, long = "device")]
        devices: Vec<PathBuf>,
        /// Speed preset
        #[arg(long)]
        speed: Option<SpeedArg>,
        /// Smoothness preset
        #[arg(long)]
        smoothness: Option<SmoothnessArg>,
    },
    /// List scroll wheel devices
    Devices,
    /// Show the pixel delta a raw wheel delta previews to
    Preview {
        /// Raw wheel delta in ticks
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum SpeedArg {
    Slow,
    Medium,
    Fast,
}

impl From<SpeedArg> for SpeedPreset {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Slow => SpeedPreset::Slow,
            SpeedArg::Medium => SpeedPreset::Medium,
            SpeedArg::Fast => SpeedPreset::Fast,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SmoothnessArg {
    Low,
    Regular,
    High,
}

impl From<SmoothnessArg> for SmoothnessPreset {
    fn from(arg: SmoothnessArg) -> Self {
        match arg {
            SmoothnessArg::Low => SmoothnessPreset::Low,
            SmoothnessArg::Regular => SmoothnessPreset::Regular,
            SmoothnessArg::High => SmoothnessPreset::High,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; the config may lower or raise the level below
    let env_filter = std::env::var("RUST_LOG").ok();
    let (filter, filter_handle) = reload::Layer::new(EnvFilter::new(
        env_filter.as_deref().unwrap_or("info"),
    ));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)?;

    if env_filter.is_none() {
        if let Err(e) = filter_handle.reload(EnvFilter::new(&config.general.log_level)) {
            tracing::warn!("Failed to apply log level from config: {}", e);
        }
    }

    match cli.command {
        Some(Commands::Run {
            devices,
            speed,
            smoothness,
        }) => {
            let options = commands::run::RunOptions {
                devices,
                speed: speed.map(Into::into),
                smoothness: smoothness.map(Into::into),
            };
            commands::run::run(config, config_path, options).await
        }
        None => commands::run::run(config, config_path, Default::default()).await,
        Some(Commands::Devices) => commands::devices::run(&config),
        Some(Commands::Preview { delta }) => commands::preview::run(&config, delta),
        Some(Commands::Config) => commands::config::run(&config, &config_path),
    }
}
