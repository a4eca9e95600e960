//! Native host seams
//!
//! The desktop shell (window, monitors, input hooks, bundled resources) is
//! provided by the host process. These traits describe the subset this crate
//! calls into; `headless`, `resources` and `gamepad` provide implementations
//! that work without a GUI.

pub mod gamepad;
pub mod headless;
pub mod resources;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::error;

use crate::input::Monitor;

pub use gamepad::{GilrsListener, NativeBridge};
pub use headless::HeadlessWindow;
pub use resources::FsResources;

/// Window size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

/// Window size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("resource not found: {0}")]
    ResourceNotFound(PathBuf),
}

/// The pet window and the displays around it
#[async_trait]
pub trait WindowHost: Send + Sync {
    async fn scale_factor(&self) -> Result<f64>;

    /// Inner size of the webview in logical pixels
    async fn inner_size(&self) -> Result<LogicalSize>;

    /// Outer window size in physical pixels
    async fn size(&self) -> Result<PhysicalSize>;

    async fn set_logical_size(&self, size: LogicalSize) -> Result<()>;

    async fn set_physical_size(&self, size: PhysicalSize) -> Result<()>;

    async fn available_monitors(&self) -> Result<Vec<Monitor>>;
}

/// Fire-and-forget commands understood by the native listener
#[async_trait]
pub trait NativeCommands: Send + Sync {
    async fn start_device_listening(&self) -> Result<()>;

    async fn stop_device_listening(&self) -> Result<()>;

    async fn start_gamepad_listening(&self) -> Result<()>;

    async fn stop_gamepad_listening(&self) -> Result<()>;
}

/// Bundled resource lookup
#[async_trait]
pub trait ResourceResolver: Send + Sync {
    /// Resolve a resource path to an absolute, existing path
    async fn resolve_resource(&self, path: &Path) -> Result<PathBuf>;

    /// File names in a directory
    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>>;
}

/// User-visible notifications (toasts)
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        error!("❌ {}", message);
    }
}
