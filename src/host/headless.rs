//! In-memory window host
//!
//! Keeps the window geometry in memory so the sizing policy and the mouse
//! path can run without a real desktop. Logical and physical sizes are kept
//! consistent through the scale factor.

use super::{LogicalSize, PhysicalSize, WindowHost};
use crate::input::Monitor;
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

struct WindowState {
    scale_factor: f64,
    logical: LogicalSize,
    monitors: Vec<Monitor>,
    resize_count: u64,
}

/// Window host backed by plain memory
pub struct HeadlessWindow {
    state: Mutex<WindowState>,
}

impl HeadlessWindow {
    pub fn new(width: f64, height: f64, scale_factor: f64, monitors: Vec<Monitor>) -> Self {
        Self {
            state: Mutex::new(WindowState {
                scale_factor,
                logical: LogicalSize { width, height },
                monitors,
                resize_count: 0,
            }),
        }
    }

    /// Number of size writes applied so far
    pub fn resize_count(&self) -> u64 {
        self.state.lock().resize_count
    }

    pub fn logical(&self) -> LogicalSize {
        self.state.lock().logical
    }

    pub fn set_monitors(&self, monitors: Vec<Monitor>) {
        self.state.lock().monitors = monitors;
    }
}

#[async_trait]
impl WindowHost for HeadlessWindow {
    async fn scale_factor(&self) -> Result<f64> {
        Ok(self.state.lock().scale_factor)
    }

    async fn inner_size(&self) -> Result<LogicalSize> {
        Ok(self.state.lock().logical)
    }

    async fn size(&self) -> Result<PhysicalSize> {
        let state = self.state.lock();
        Ok(PhysicalSize {
            width: (state.logical.width * state.scale_factor).round() as u32,
            height: (state.logical.height * state.scale_factor).round() as u32,
        })
    }

    async fn set_logical_size(&self, size: LogicalSize) -> Result<()> {
        debug!("Window logical size -> {}x{}", size.width, size.height);
        let mut state = self.state.lock();
        state.logical = size;
        state.resize_count += 1;
        Ok(())
    }

    async fn set_physical_size(&self, size: PhysicalSize) -> Result<()> {
        debug!("Window physical size -> {}x{}", size.width, size.height);
        let mut state = self.state.lock();
        let scale = if state.scale_factor > 0.0 { state.scale_factor } else { 1.0 };
        state.logical = LogicalSize {
            width: f64::from(size.width) / scale,
            height: f64::from(size.height) / scale,
        };
        state.resize_count += 1;
        Ok(())
    }

    async fn available_monitors(&self) -> Result<Vec<Monitor>> {
        Ok(self.state.lock().monitors.clone())
    }
}
