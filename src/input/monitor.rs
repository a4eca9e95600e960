//! Monitor geometry and cursor resolution

use serde::{Deserialize, Serialize};

/// Cursor position as reported by the native hook
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CursorPoint {
    pub x: f64,
    pub y: f64,
}

impl CursorPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to the nearest integer
    pub fn rounded(self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    /// Convert a physical point into logical coordinates
    pub fn to_logical(self, scale_factor: f64) -> Self {
        if scale_factor <= 0.0 {
            return self;
        }
        Self {
            x: self.x / scale_factor,
            y: self.y / scale_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// A physical display, in physical pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(default)]
    pub name: Option<String>,
    pub position: Position,
    pub size: Size,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

fn default_scale_factor() -> f64 {
    1.0
}

impl Monitor {
    /// Whether a logical point lies inside this monitor's logical bounds
    pub fn contains_logical(&self, point: CursorPoint) -> bool {
        let scale = if self.scale_factor > 0.0 { self.scale_factor } else { 1.0 };
        let left = f64::from(self.position.x) / scale;
        let top = f64::from(self.position.y) / scale;
        let right = left + f64::from(self.size.width) / scale;
        let bottom = top + f64::from(self.size.height) / scale;

        point.x >= left && point.x < right && point.y >= top && point.y < bottom
    }

    /// Cursor offset inside the monitor as a fraction of its size
    ///
    /// Not clamped: a cursor slightly outside the resolved monitor yields a
    /// ratio below 0 or above 1.
    pub fn cursor_ratio(&self, cursor: CursorPoint) -> (f64, f64) {
        let x = (cursor.x - f64::from(self.position.x)) / f64::from(self.size.width.max(1));
        let y = (cursor.y - f64::from(self.position.y)) / f64::from(self.size.height.max(1));
        (x, y)
    }
}

/// Monitor that contains the cursor, with the cursor position to use for it
#[derive(Debug, Clone, PartialEq)]
pub struct CursorMonitor {
    pub monitor: Monitor,
    pub cursor: CursorPoint,
}

/// Find the monitor that contains a raw (physical) cursor position
///
/// The cursor is converted to logical coordinates with the window's scale
/// factor before the lookup. Returns `None` when the cursor is outside every
/// known monitor.
pub fn resolve_cursor_monitor(
    cursor: CursorPoint,
    scale_factor: f64,
    monitors: &[Monitor],
) -> Option<CursorMonitor> {
    let logical = cursor.to_logical(scale_factor);

    monitors
        .iter()
        .find(|m| m.contains_logical(logical))
        .map(|monitor| CursorMonitor {
            monitor: monitor.clone(),
            cursor,
        })
}
