//! Input mapper - turns device events into rig parameter writes
//!
//! The mapper is owned by the runtime and runs every handler to completion
//! before the next event is processed:
//! - Keyboard path: key normalization, pressed-key tracking, synthetic releases
//! - Mouse path: button parameters, cursor tracking relative to the monitor
//! - Gamepad path: stick axes, thumb buttons, stick hand visibility
//!
//! Key state lives in the model store so that it is dropped together with the
//! model it belongs to.

mod gamepad;
mod keyboard;
mod mouse;

pub use gamepad::{StickState, Sticks};

#[cfg(test)]
mod tests;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::KeyboardConfig;
use crate::host::WindowHost;
use crate::input::{CursorPoint, DeviceEvent, Monitor, ReleaseFired, ReleaseScheduler, Side};
use crate::rig::{params, Rig};
use crate::stores::{ModelStore, Stores};

pub struct InputMapper {
    /// Animation rig receiving parameter writes
    pub(crate) rig: Arc<dyn Rig>,
    /// Window host, queried for the scale factor on multi-monitor setups
    pub(crate) window: Arc<dyn WindowHost>,
    /// Pending synthetic releases
    pub(crate) releases: ReleaseScheduler,
    /// Keyboard release settings (hot-reloadable)
    pub(crate) keyboard: KeyboardConfig,
    /// Last processed (rounded) cursor position
    pub(crate) last_mouse: CursorPoint,
    /// Monitors known at the last refresh
    pub(crate) monitors: Vec<Monitor>,
    /// Stick state, owned by the gamepad path
    pub(crate) sticks: Sticks,
}

impl InputMapper {
    /// Create a mapper and the receiver its release timers report to
    ///
    /// The receiver must be polled by the runtime and every item passed back
    /// to [`InputMapper::handle_release_fired`].
    pub fn new(
        rig: Arc<dyn Rig>,
        window: Arc<dyn WindowHost>,
        keyboard: KeyboardConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ReleaseFired>) {
        let (releases, fired_rx) = ReleaseScheduler::new();
        (
            Self {
                rig,
                window,
                releases,
                keyboard,
                last_mouse: CursorPoint::default(),
                monitors: Vec::new(),
                sticks: Sticks::default(),
            },
            fired_rx,
        )
    }

    /// Dispatch a `device-changed` event
    pub async fn handle_device_event(&mut self, event: DeviceEvent, stores: &mut Stores) {
        match event {
            DeviceEvent::KeyboardPress(key) => self.handle_keyboard(&key, true, &mut stores.model),
            DeviceEvent::KeyboardRelease(key) => {
                self.handle_keyboard(&key, false, &mut stores.model)
            }
            DeviceEvent::MousePress(button) => self.handle_mouse_button(&button, true),
            DeviceEvent::MouseRelease(button) => self.handle_mouse_button(&button, false),
            DeviceEvent::MouseMove(point) => {
                let mirror = stores.cat.mouse_mirror;
                self.handle_mouse_move(point, mirror).await
            }
        }
    }

    /// Apply a fired release timer, unless it was superseded
    pub fn handle_release_fired(&mut self, fired: ReleaseFired, model: &mut ModelStore) {
        if let Some(key) = self.releases.claim(fired) {
            trace!("Synthetic release for {}", key);
            self.release_key(&key, model);
        }
    }

    /// Mark a key as held and raise the hand on its side
    ///
    /// Keys without artwork in the current model are ignored.
    pub(crate) fn press_key(&self, key: &str, model: &mut ModelStore) {
        let Some(supported) = model.supported_keys.get(key) else {
            trace!("Ignoring unsupported key {}", key);
            return;
        };
        let side = supported.side;
        let image = supported.image.clone();

        if model.pressed_keys.insert(key.to_string(), image).is_none() {
            debug!("Key down: {} ({:?})", key, side);
        }
        self.sync_hand(side, model);
    }

    /// Forget a held key and lower its hand when no other key holds it
    pub(crate) fn release_key(&self, key: &str, model: &mut ModelStore) {
        if model.pressed_keys.remove(key).is_none() {
            return;
        }
        debug!("Key up: {}", key);

        if let Some(side) = model.supported_keys.get(key).map(|s| s.side) {
            self.sync_hand(side, model);
        }
    }

    fn sync_hand(&self, side: Side, model: &ModelStore) {
        let held = model
            .pressed_keys
            .keys()
            .filter_map(|k| model.supported_keys.get(k))
            .any(|s| s.side == side);

        let id = match side {
            Side::Left => params::LEFT_HAND_DOWN,
            Side::Right => params::RIGHT_HAND_DOWN,
        };

        if let Some(value) = self.rig.parameter_range(id).pressed_value(held) {
            self.rig.set_parameter_value(id, value);
        }
    }

    /// Re-read the monitor list from the window host
    ///
    /// On failure the previous list is kept.
    pub async fn refresh_monitors(&mut self) {
        match self.window.available_monitors().await {
            Ok(monitors) => {
                debug!("Monitors refreshed: {}", monitors.len());
                self.monitors = monitors;
            }
            Err(e) => warn!("Failed to list monitors (keeping {}): {:#}", self.monitors.len(), e),
        }
    }

    /// Apply reloaded keyboard settings; pending timers keep their old delay
    pub fn update_keyboard_config(&mut self, keyboard: KeyboardConfig) {
        if self.keyboard != keyboard {
            debug!("Keyboard settings updated: {:?}", keyboard);
            self.keyboard = keyboard;
        }
    }

    pub fn keyboard_config(&self) -> &KeyboardConfig {
        &self.keyboard
    }

    pub fn sticks(&self) -> &Sticks {
        &self.sticks
    }

    pub fn pending_releases(&self) -> usize {
        self.releases.pending_count()
    }

    /// Cancel every pending synthetic release
    pub fn cancel_all(&mut self) {
        self.releases.cancel_all();
    }
}
