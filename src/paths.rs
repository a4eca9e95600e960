//! Application paths for dev, portable and installed modes
//!
//! ## Mode Detection
//!
//! - **Dev mode** (debug builds): `deskcat.yaml` in the working directory puts
//!   everything next to it.
//! - **Portable mode**: a `.portable` marker next to the executable keeps all
//!   data files in the executable's directory.
//! - **Installed mode** (default): data lives in the platform data directory
//!   (`%APPDATA%\DeskCat`, `~/.local/share/DeskCat`, ...).

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application name used for directories in installed mode
const APP_NAME: &str = "DeskCat";

/// Configuration file name
pub const CONFIG_FILE: &str = "deskcat.yaml";

/// Bundled resources folder name
const RESOURCES_DIR: &str = "resources";

/// Models folder, relative to the resources root
const MODELS_DIR: &str = "assets/models";

#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Path to the configuration file
    pub config: PathBuf,
    /// Path to the state directory (sled database)
    pub state_dir: PathBuf,
    /// Path to the logs directory
    pub logs_dir: PathBuf,
    /// Directory of the running executable
    pub exe_dir: PathBuf,
    /// Whether data files live next to the executable (or in the dev dir)
    pub is_portable: bool,
}

impl AppPaths {
    /// Detect the appropriate paths based on environment
    ///
    /// Called before logging is initialized, so diagnostics go to stderr.
    pub fn detect() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        #[cfg(debug_assertions)]
        {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            if cwd.join(CONFIG_FILE).exists() {
                eprintln!("[paths] Running in DEV mode ({})", cwd.display());
                return Self::in_dir(&cwd, exe_dir, true);
            }
        }

        if exe_dir.join(".portable").exists() {
            #[cfg(debug_assertions)]
            eprintln!("[paths] Running in PORTABLE mode (.portable marker found)");
            let base = exe_dir.clone();
            return Self::in_dir(&base, exe_dir, true);
        }

        let app_data = dirs::data_dir()
            .unwrap_or_else(|| {
                eprintln!("[paths] WARNING: no data directory, falling back to exe dir");
                exe_dir.clone()
            })
            .join(APP_NAME);

        #[cfg(debug_assertions)]
        eprintln!("[paths] Running in INSTALLED mode ({})", app_data.display());

        Self::in_dir(&app_data, exe_dir, false)
    }

    /// Lay out every path under one base directory
    pub fn in_dir(base: &Path, exe_dir: PathBuf, is_portable: bool) -> Self {
        let state_name = if is_portable { ".state" } else { "state" };
        Self {
            config: base.join(CONFIG_FILE),
            state_dir: base.join(state_name),
            logs_dir: base.join("logs"),
            exe_dir,
            is_portable,
        }
    }

    /// Use an explicit config file
    pub fn with_config(mut self, config: PathBuf) -> Self {
        self.config = config;
        self
    }

    /// Directory holding the config file
    pub fn base_dir(&self) -> PathBuf {
        self.config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Create the state and logs directories
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        for dir in [&self.state_dir, &self.logs_dir] {
            if !dir.exists() {
                debug!("Creating directory: {}", dir.display());
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }
        Ok(())
    }

    /// sled database path (within state_dir)
    pub fn sled_db_path(&self) -> PathBuf {
        self.state_dir.join("sled")
    }

    /// Resources root: the configured one, else `resources` next to the
    /// executable, else `resources` next to the config file
    pub fn resources_dir(&self, configured: Option<&Path>) -> PathBuf {
        if let Some(dir) = configured {
            return if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                self.base_dir().join(dir)
            };
        }

        let beside_exe = self.exe_dir.join(RESOURCES_DIR);
        if beside_exe.is_dir() {
            beside_exe
        } else {
            self.base_dir().join(RESOURCES_DIR)
        }
    }

    /// Folder holding the preset models
    pub fn models_dir(resources_dir: &Path) -> PathBuf {
        resources_dir.join(MODELS_DIR)
    }
}
