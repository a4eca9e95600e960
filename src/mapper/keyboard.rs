//! Keyboard path

use tracing::trace;

use crate::input::keys::CAPS_LOCK;
use crate::input::normalize_key;
use crate::stores::ModelStore;

impl super::InputMapper {
    /// Handle a raw keyboard press or release
    ///
    /// `CapsLock` never reports a usable release, so any event for it is a
    /// press followed by a short automatic release. Other presses get a
    /// synthetic release when the platform only reports presses.
    pub(crate) fn handle_keyboard(&mut self, raw: &str, pressed: bool, model: &mut ModelStore) {
        let Some(key) = normalize_key(raw, &model.supported_keys) else {
            return;
        };
        if key != raw {
            trace!("Normalized {} -> {}", raw, key);
        }

        if key == CAPS_LOCK {
            self.press_key(&key, model);
            self.releases.schedule(&key, self.keyboard.caps_lock_delay());
            return;
        }

        if pressed {
            if self.keyboard.synthetic_release {
                self.releases.schedule(&key, self.keyboard.release_delay());
            }
            self.press_key(&key, model);
        } else {
            self.releases.cancel(&key);
            self.release_key(&key, model);
        }
    }
}
