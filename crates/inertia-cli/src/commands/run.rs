use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

use inertia_core::tunables::{SmoothnessPreset, SpeedPreset};
use inertia_core::{AppConfig, ScrollEngine, SharedTunables, TunableSource, Tunables};
use inertia_evdev::{EvdevFilter, VirtualPointer};

/// Command-line overrides on top of the config file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub devices: Vec<PathBuf>,
    pub speed: Option<SpeedPreset>,
    pub smoothness: Option<SmoothnessPreset>,
}

fn effective_tunables(config: &AppConfig, options: &RunOptions) -> Tunables {
    let mut tunables = config.tunables();
    if let Some(preset) = options.speed {
        tunables.apply_speed_preset(preset);
    }
    if let Some(preset) = options.smoothness {
        tunables.apply_smoothness_preset(preset);
    }
    tunables.clamped()
}

fn reload(path: &Path, options: &RunOptions, tunables: &SharedTunables) {
    match AppConfig::load_from(path) {
        Ok(config) => {
            tunables.replace(effective_tunables(&config, options));
            info!("Reloaded tunables from {}", path.display());
        }
        Err(e) => warn!("Reload failed, keeping current tunables: {}", e),
    }
}

pub async fn run(config: AppConfig, config_path: PathBuf, options: RunOptions) -> Result<()> {
    if !config.general.enabled {
        println!(
            "Scroll engine is disabled in {} (set general.enabled = true).",
            config_path.display()
        );
        return Ok(());
    }

    let tunables = SharedTunables::new(effective_tunables(&config, &options));
    let paths = if options.devices.is_empty() {
        config.devices.paths.clone()
    } else {
        options.devices.clone()
    };

    let pointer = VirtualPointer::new();
    let filter = EvdevFilter::new(paths, config.devices.virtual_name.clone(), pointer.clone());
    let engine = ScrollEngine::new(Arc::new(tunables.clone()), Box::new(filter), Arc::new(pointer));

    engine
        .start()
        .context("Failed to start scroll engine (needs read access to /dev/input and write access to /dev/uinput)")?;

    let current = tunables.snapshot();
    println!("inertia running. Press Ctrl+C to stop, send SIGHUP to reload tunables.");
    println!(
        "  Speed: {:.1} ({:?}), curve exponent {:.2}",
        current.base_speed,
        current.speed_preset(),
        current.curve_exponent
    );
    println!(
        "  Smoothness: {:.2}, momentum {:.2}s ({:?})",
        current.smoothness,
        current.momentum_duration,
        current.smoothness_preset()
    );

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM");
                break;
            }
            _ = hangup.recv() => reload(&config_path, &options, &tunables),
        }
    }

    engine.stop();
    println!("inertia stopped.");

    Ok(())
}
