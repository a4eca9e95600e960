//! Configuration management for deskcat
//!
//! Handles loading, parsing, and hot-reloading of the YAML configuration file.
//! Every section is optional; a missing file or an empty document yields the
//! defaults.

pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::info;

use crate::input::Monitor;

pub use watcher::ConfigWatcher;

/// Upper bound accepted for any release delay
const MAX_RELEASE_DELAY_MS: u64 = 10_000;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the bundled resources (models live in `<root>/assets/models`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_dir: Option<PathBuf>,
    pub keyboard: KeyboardConfig,
    pub gamepad: GamepadConfig,
    pub persistence: PersistenceConfig,
    pub headless: HeadlessConfig,
}

/// Keyboard release handling
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeyboardConfig {
    /// Schedule a release after every press (platforms without release events)
    #[serde(default = "default_synthetic_release")]
    pub synthetic_release: bool,
    #[serde(default = "default_release_delay_ms")]
    pub release_delay_ms: u64,
    #[serde(default = "default_caps_lock_release_ms")]
    pub caps_lock_release_ms: u64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            synthetic_release: default_synthetic_release(),
            release_delay_ms: default_release_delay_ms(),
            caps_lock_release_ms: default_caps_lock_release_ms(),
        }
    }
}

impl KeyboardConfig {
    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }

    pub fn caps_lock_delay(&self) -> Duration {
        Duration::from_millis(self.caps_lock_release_ms)
    }
}

/// Gamepad configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GamepadConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Poll gamepads in-process with gilrs instead of relying on the host
    #[serde(default)]
    pub native: bool,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            native: false,
        }
    }
}

/// Preference persistence
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Width and height pair
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Geometry used when no desktop shell is attached
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HeadlessConfig {
    /// Initial logical window size
    #[serde(default = "default_window_size")]
    pub window: Dimensions,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Natural size reported for every loaded model
    #[serde(default = "default_model_size")]
    pub model_size: Dimensions,
    #[serde(default)]
    pub monitors: Vec<Monitor>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            window: default_window_size(),
            scale_factor: default_scale_factor(),
            model_size: default_model_size(),
            monitors: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        };

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, defaults otherwise
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if fs::try_exists(path).await.unwrap_or(false) {
            Self::load(path).await
        } else {
            info!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        let keyboard = &self.keyboard;
        for (name, value) in [
            ("keyboard.release_delay_ms", keyboard.release_delay_ms),
            ("keyboard.caps_lock_release_ms", keyboard.caps_lock_release_ms),
        ] {
            if value == 0 || value > MAX_RELEASE_DELAY_MS {
                anyhow::bail!(
                    "{} must be between 1 and {} (got {})",
                    name,
                    MAX_RELEASE_DELAY_MS,
                    value
                );
            }
        }

        let headless = &self.headless;
        if !positive(headless.scale_factor) {
            anyhow::bail!("headless.scale_factor must be positive");
        }
        for (name, size) in [
            ("headless.window", headless.window),
            ("headless.model_size", headless.model_size),
        ] {
            if !positive(size.width) || !positive(size.height) {
                anyhow::bail!("{} must have a positive width and height", name);
            }
        }
        for (idx, monitor) in headless.monitors.iter().enumerate() {
            if monitor.size.width == 0 || monitor.size.height == 0 {
                anyhow::bail!("headless.monitors[{}] has an empty size", idx);
            }
        }

        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn default_true() -> bool {
    true
}
fn default_synthetic_release() -> bool {
    // Windows hooks only report presses
    cfg!(windows)
}
fn default_release_delay_ms() -> u64 {
    500
}
fn default_caps_lock_release_ms() -> u64 {
    100
}
fn default_debounce_ms() -> u64 {
    crate::stores::DEFAULT_DEBOUNCE_MS
}
fn default_scale_factor() -> f64 {
    1.0
}
fn default_window_size() -> Dimensions {
    Dimensions {
        width: 612.0,
        height: 354.0,
    }
}
fn default_model_size() -> Dimensions {
    Dimensions {
        width: 612.0,
        height: 354.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
keyboard:
  synthetic_release: true
headless:
  scale_factor: 2.0
  monitors:
    - position: { x: 0, y: 0 }
      size: { width: 1920, height: 1080 }
"#,
        )
        .unwrap();

        assert!(config.keyboard.synthetic_release);
        assert_eq!(config.keyboard.release_delay(), Duration::from_millis(500));
        assert_eq!(config.keyboard.caps_lock_delay(), Duration::from_millis(100));
        assert!(config.gamepad.enabled);
        assert_eq!(config.headless.scale_factor, 2.0);
        assert_eq!(config.headless.monitors[0].scale_factor, 1.0);
        assert_eq!(config.persistence.debounce_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.keyboard.release_delay_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.headless.scale_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.headless.model_size.height = -1.0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");

        let mut config = AppConfig::default();
        config.resources_dir = Some(PathBuf::from("/opt/deskcat/resources"));
        config.keyboard.release_delay_ms = 250;
        config.save(&path).await.unwrap();

        let loaded = AppConfig::load(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_missing_file_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&temp.path().join("absent.yaml"))
            .await
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_empty_file_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "\n").unwrap();

        assert_eq!(AppConfig::load(&path).await.unwrap(), AppConfig::default());
    }
}
