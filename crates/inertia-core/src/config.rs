use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tunables::{SmoothnessPreset, SpeedPreset, Tunables};

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Default name of the virtual pointer that carries synthetic events
pub const DEFAULT_VIRTUAL_DEVICE_NAME: &str = "Inertia Virtual Pointer";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub devices: DeviceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Schema version of the file; absent in files written before versioning
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Start the engine when the host launches
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            enabled: default_true(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(flatten)]
    pub tunables: Tunables,
    /// Overrides `base_speed` when set to a named preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_preset: Option<SpeedPreset>,
    /// Overrides `smoothness` and `momentum_duration` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothness_preset: Option<SmoothnessPreset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Explicit evdev nodes (e.g. /dev/input/event5); empty = auto-detect
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    /// Name of the uinput device synthetic events are posted through
    #[serde(default = "default_virtual_name")]
    pub virtual_name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            virtual_name: default_virtual_name(),
        }
    }
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_virtual_name() -> String {
    DEFAULT_VIRTUAL_DEVICE_NAME.to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let path = expand_tilde(path);
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config = Self::parse(&content)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse TOML and bring it up to the current schema
    pub fn parse(content: &str) -> crate::Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.migrate();
        Ok(config)
    }

    /// Fill defaults, resolve presets and clamp tunables for the current schema
    pub fn migrate(&mut self) {
        if self.general.schema_version > CURRENT_SCHEMA_VERSION {
            warn!(
                "Configuration schema {} is newer than supported {}, reading known fields only",
                self.general.schema_version, CURRENT_SCHEMA_VERSION
            );
        }

        if let Some(preset) = self.scroll.speed_preset {
            self.scroll.tunables.apply_speed_preset(preset);
        }
        if let Some(preset) = self.scroll.smoothness_preset {
            self.scroll.tunables.apply_smoothness_preset(preset);
        }

        for field in self.scroll.tunables.out_of_range() {
            warn!("scroll.{} out of range, clamping", field);
        }
        self.scroll.tunables = self.scroll.tunables.clamped();

        for path in &mut self.devices.paths {
            *path = expand_tilde(path);
        }

        self.general.schema_version = self.general.schema_version.max(CURRENT_SCHEMA_VERSION);
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/inertia/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("inertia")
            .join("config.toml")
    }

    pub fn tunables(&self) -> Tunables {
        self.scroll.tunables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert!(config.general.enabled);
        assert_eq!(config.general.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(config.tunables(), Tunables::default());
        assert!(config.devices.paths.is_empty());
        assert_eq!(config.devices.virtual_name, DEFAULT_VIRTUAL_DEVICE_NAME);
    }

    #[test]
    fn test_partial_scroll_section() {
        let config = AppConfig::parse(
            r#"
            [scroll]
            base_speed = 6.5
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.tunables.base_speed, 6.5);
        assert_eq!(config.scroll.tunables.curve_exponent, 1.5);
        assert_eq!(config.scroll.tunables.smoothness, 0.6);
    }

    #[test]
    fn test_migration_clamps_and_stamps_version() {
        let config = AppConfig::parse(
            r#"
            [general]
            enabled = false

            [scroll]
            base_speed = 25.0
            momentum_duration = 3.0
            "#,
        )
        .unwrap();
        assert!(!config.general.enabled);
        assert_eq!(config.general.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(config.scroll.tunables.base_speed, 10.0);
        assert_eq!(config.scroll.tunables.momentum_duration, 2.0);
    }

    #[test]
    fn test_presets_override_values() {
        let config = AppConfig::parse(
            r#"
            [scroll]
            base_speed = 3.0
            speed_preset = "slow"
            smoothness_preset = "low"
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.tunables.base_speed, 2.0);
        assert_eq!(config.scroll.tunables.smoothness, 0.3);
        assert_eq!(config.scroll.tunables.momentum_duration, 0.3);
    }

    #[test]
    fn test_unknown_preset_is_config_error() {
        let err = AppConfig::parse(
            r#"
            [scroll]
            speed_preset = "ludicrous"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = AppConfig::default();
        config.devices.paths.push(PathBuf::from("/dev/input/event7"));
        let text = config.to_toml().unwrap();
        let back = AppConfig::parse(&text).unwrap();
        assert_eq!(back.devices.paths, vec![PathBuf::from("/dev/input/event7")]);
        assert_eq!(back.tunables(), config.tunables());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/inertia/config.toml")).unwrap();
        assert_eq!(config.tunables(), Tunables::default());
    }
}
