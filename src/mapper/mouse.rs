//! Mouse path

use tracing::{trace, warn};

use crate::input::{resolve_cursor_monitor, CursorMonitor, CursorPoint};
use crate::rig::params;

impl super::InputMapper {
    /// Button parameters go to their max bound on press and min on release
    pub(crate) fn handle_mouse_button(&self, button: &str, pressed: bool) {
        let id = match button {
            "Left" => params::MOUSE_LEFT_DOWN,
            "Right" => params::MOUSE_RIGHT_DOWN,
            other => {
                trace!("Ignoring mouse button {}", other);
                return;
            }
        };

        if let Some(value) = self.rig.parameter_range(id).pressed_value(pressed) {
            self.rig.set_parameter_value(id, value);
        }
    }

    /// Track the cursor with the head and eyes
    ///
    /// Positions are rounded and a position equal to the last processed one
    /// is dropped. Ratios are relative to the monitor under the cursor and
    /// are not clamped.
    pub(crate) async fn handle_mouse_move(&mut self, point: CursorPoint, mirror: bool) {
        let point = point.rounded();
        if point == self.last_mouse {
            return;
        }
        self.last_mouse = point;

        let Some(target) = self.cursor_monitor(point).await else {
            trace!("Cursor ({}, {}) is outside every monitor", point.x, point.y);
            return;
        };

        let (x_ratio, y_ratio) = target.monitor.cursor_ratio(target.cursor);

        for id in params::MOUSE_TRACKING {
            let horizontal = params::is_horizontal(id);
            let ratio = if horizontal { x_ratio } else { y_ratio };

            let Some(mut value) = self.rig.parameter_range(id).inverted_lerp(ratio) else {
                continue;
            };
            if horizontal && mirror {
                value = -value;
            }

            self.rig.set_parameter_value(id, value);
        }
    }

    async fn cursor_monitor(&self, point: CursorPoint) -> Option<CursorMonitor> {
        if let [monitor] = self.monitors.as_slice() {
            return Some(CursorMonitor {
                monitor: monitor.clone(),
                cursor: point,
            });
        }

        let scale_factor = match self.window.scale_factor().await {
            Ok(scale_factor) => scale_factor,
            Err(e) => {
                warn!("Failed to read window scale factor: {:#}", e);
                return None;
            }
        };

        resolve_cursor_monitor(point, scale_factor, &self.monitors)
    }
}
