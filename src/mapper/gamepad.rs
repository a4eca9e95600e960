//! Gamepad path

use tracing::trace;

use crate::input::{GamepadEvent, GamepadEventKind, Side};
use crate::rig::params;
use crate::stores::ModelStore;

/// One analog stick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickState {
    pub x: f64,
    pub y: f64,
    /// Deflected from the center
    pub moved: bool,
    /// Thumb button held
    pub pressed: bool,
}

impl StickState {
    /// Recompute `moved` and return whether the hand should be shown
    fn refresh(&mut self) -> bool {
        self.moved = self.x != 0.0 || self.y != 0.0;
        self.moved || self.pressed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sticks {
    pub left: StickState,
    pub right: StickState,
}

impl Sticks {
    pub fn get(&self, side: Side) -> &StickState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut StickState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

enum StickInput {
    X,
    Y,
    Thumb,
}

/// Stick inputs by gilrs name
fn stick_input(name: &str) -> Option<(Side, StickInput)> {
    match name {
        "LeftStickX" => Some((Side::Left, StickInput::X)),
        "LeftStickY" => Some((Side::Left, StickInput::Y)),
        "RightStickX" => Some((Side::Right, StickInput::X)),
        "RightStickY" => Some((Side::Right, StickInput::Y)),
        "LeftThumb" => Some((Side::Left, StickInput::Thumb)),
        "RightThumb" => Some((Side::Right, StickInput::Thumb)),
        _ => None,
    }
}

impl super::InputMapper {
    /// Handle a `gamepad-changed` event
    ///
    /// Stick axes pass their value straight through; thumbs drive the stick
    /// press flag. Any other button acts like a key with the button name as
    /// identifier, without normalization or synthetic release.
    pub fn handle_gamepad_event(&mut self, event: &GamepadEvent, model: &mut ModelStore) {
        let Some((side, input)) = stick_input(&event.name) else {
            match event.kind {
                GamepadEventKind::ButtonChanged if event.value > 0.0 => {
                    self.press_key(&event.name, model)
                }
                GamepadEventKind::ButtonChanged => self.release_key(&event.name, model),
                GamepadEventKind::AxisChanged => trace!("Ignoring axis {}", event.name),
            }
            return;
        };

        let stick = self.sticks.get_mut(side);
        match input {
            StickInput::X => {
                stick.x = event.value;
                let id = match side {
                    Side::Left => params::STICK_LX,
                    Side::Right => params::STICK_RX,
                };
                self.rig.set_parameter_value(id, event.value);
            }
            StickInput::Y => {
                stick.y = event.value;
                let id = match side {
                    Side::Left => params::STICK_LY,
                    Side::Right => params::STICK_RY,
                };
                self.rig.set_parameter_value(id, event.value);
            }
            StickInput::Thumb => {
                stick.pressed = event.value != 0.0;
                let id = match side {
                    Side::Left => params::STICK_LEFT_DOWN,
                    Side::Right => params::STICK_RIGHT_DOWN,
                };
                self.rig.set_parameter_flag(id, stick.pressed);
            }
        }

        let visible = stick.refresh();
        let id = match side {
            Side::Left => params::STICK_SHOW_LEFT_HAND,
            Side::Right => params::STICK_SHOW_RIGHT_HAND,
        };
        self.rig.set_parameter_flag(id, visible);
    }
}
