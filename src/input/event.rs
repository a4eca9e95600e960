//! Wire format of events forwarded by the native host
//!
//! The host emits JSON payloads on two channels:
//!
//! - `device-changed`: `{"kind": "KeyboardPress", "value": "KeyA"}`,
//!   `{"kind": "MouseMove", "value": {"x": 10.0, "y": 20.0}}`, ...
//! - `gamepad-changed`: `{"kind": "AxisChanged", "name": "LeftStickX", "value": 0.5}`
//!
//! The stdin bridge wraps them in a [`HostMessage`] envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::monitor::CursorPoint;
use crate::menu::MenuAction;

/// Keyboard and mouse events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum DeviceEvent {
    MousePress(String),
    MouseRelease(String),
    MouseMove(CursorPoint),
    KeyboardPress(String),
    KeyboardRelease(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamepadEventKind {
    ButtonChanged,
    AxisChanged,
}

/// Gamepad button or axis change, named after the gilrs enum variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamepadEvent {
    pub kind: GamepadEventKind,
    pub name: String,
    pub value: f64,
}

impl GamepadEvent {
    pub fn button(name: impl Into<String>, value: f64) -> Self {
        Self {
            kind: GamepadEventKind::ButtonChanged,
            name: name.into(),
            value,
        }
    }

    pub fn axis(name: impl Into<String>, value: f64) -> Self {
        Self {
            kind: GamepadEventKind::AxisChanged,
            name: name.into(),
            value,
        }
    }
}

/// Everything the runtime can receive from the host process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum HostMessage {
    DeviceChanged(DeviceEvent),
    GamepadChanged(GamepadEvent),
    /// Switch the current model by id
    SelectModel(String),
    /// A menu entry was activated
    Menu(MenuAction),
    /// The window was resized by the user or the shell
    WindowResized,
    /// Displays were added, removed or rearranged
    MonitorsChanged,
}

#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("empty message")]
    Empty,
    #[error("invalid host message: {0}")]
    Json(#[from] serde_json::Error),
}

impl HostMessage {
    /// Decode one line of the newline-delimited stdin bridge
    pub fn from_json_line(line: &str) -> Result<Self, EventDecodeError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(EventDecodeError::Empty);
        }
        Ok(serde_json::from_str(line)?)
    }
}
