//! Model store - available models, the current model and its key state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::input::SupportedKeys;
use crate::rig::{Expression, MotionGroups};

/// What kind of input a model reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelMode {
    Standard,
    Keyboard,
    Gamepad,
}

impl ModelMode {
    /// Preset insertion order; each is prepended, so the final list starts
    /// with `standard`
    pub const PRESET_ORDER: [ModelMode; 3] =
        [ModelMode::Gamepad, ModelMode::Keyboard, ModelMode::Standard];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelMode::Standard => "standard",
            ModelMode::Keyboard => "keyboard",
            ModelMode::Gamepad => "gamepad",
        }
    }
}

impl fmt::Display for ModelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub path: PathBuf,
    pub mode: ModelMode,
    pub is_preset: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ModelStore {
    pub models: Vec<Model>,
    pub current_model: Option<Model>,
    pub motions: MotionGroups,
    pub expressions: Vec<Expression>,
    /// Keys the loaded model has artwork for
    pub supported_keys: SupportedKeys,
    /// Currently held keys, mapped to their key image
    pub pressed_keys: BTreeMap<String, PathBuf>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the preset entries and pick the current model
    ///
    /// One preset per mode is always present. A preset keeps the id it was
    /// persisted with so the current selection survives restarts; custom
    /// models are kept after the presets.
    pub fn init(&mut self, models_root: &Path) {
        let (presets, mut next): (Vec<Model>, Vec<Model>) =
            self.models.drain(..).partition(|m| m.is_preset);

        for mode in ModelMode::PRESET_ORDER {
            let id = presets
                .iter()
                .find(|m| m.mode == mode)
                .map(|m| m.id.clone())
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            next.insert(
                0,
                Model {
                    id,
                    path: models_root.join(mode.as_str()),
                    mode,
                    is_preset: true,
                },
            );
        }

        let matched = self
            .current_model
            .as_ref()
            .and_then(|current| next.iter().find(|m| m.id == current.id))
            .cloned();

        self.current_model = matched.or_else(|| next.first().cloned());
        self.models = next;

        debug!(
            "Model store initialized: {} models, current = {:?}",
            self.models.len(),
            self.current_model.as_ref().map(|m| m.mode)
        );
    }

    pub fn current_mode(&self) -> Option<ModelMode> {
        self.current_model.as_ref().map(|m| m.mode)
    }

    /// Select the current model by id
    ///
    /// Returns `false` when the id is unknown or already current.
    pub fn select(&mut self, id: &str) -> bool {
        if self.current_model.as_ref().is_some_and(|m| m.id == id) {
            return false;
        }

        match self.models.iter().find(|m| m.id == id) {
            Some(model) => {
                self.current_model = Some(model.clone());
                true
            }
            None => false,
        }
    }

    /// Forget everything tied to the previously loaded model
    pub fn clear_loaded(&mut self) {
        self.motions.clear();
        self.expressions.clear();
        self.supported_keys.clear();
        self.pressed_keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(id: &str) -> Model {
        Model {
            id: id.to_string(),
            path: PathBuf::from("/custom").join(id),
            mode: ModelMode::Keyboard,
            is_preset: false,
        }
    }

    #[test]
    fn test_init_creates_one_preset_per_mode() {
        let mut store = ModelStore::new();
        store.init(Path::new("/res/models"));

        let modes: Vec<_> = store.models.iter().map(|m| m.mode).collect();
        assert_eq!(
            modes,
            vec![ModelMode::Standard, ModelMode::Keyboard, ModelMode::Gamepad]
        );
        assert!(store.models.iter().all(|m| m.is_preset));
        assert_eq!(store.models[1].path, PathBuf::from("/res/models/keyboard"));

        // Defaults to the first entry
        assert_eq!(store.current_mode(), Some(ModelMode::Standard));
    }

    #[test]
    fn test_init_keeps_preset_ids_and_selection() {
        let mut store = ModelStore::new();
        store.init(Path::new("/old/models"));
        let gamepad_id = store.models[2].id.clone();
        assert!(store.select(&gamepad_id));

        store.models.push(custom("mine"));
        store.init(Path::new("/new/models"));

        assert_eq!(store.models.len(), 4);
        assert_eq!(store.models.iter().filter(|m| m.is_preset).count(), 3);
        assert_eq!(store.models[2].id, gamepad_id);
        assert_eq!(store.models[3].id, "mine");

        let current = store.current_model.as_ref().unwrap();
        assert_eq!(current.id, gamepad_id);
        // Path refreshed from the new root
        assert_eq!(current.path, PathBuf::from("/new/models/gamepad"));
    }

    #[test]
    fn test_init_falls_back_when_current_is_gone() {
        let mut store = ModelStore::new();
        store.current_model = Some(custom("deleted"));
        store.init(Path::new("/res/models"));

        assert_eq!(store.current_mode(), Some(ModelMode::Standard));
    }

    #[test]
    fn test_select() {
        let mut store = ModelStore::new();
        store.init(Path::new("/res/models"));
        let keyboard_id = store.models[1].id.clone();

        assert!(store.select(&keyboard_id));
        assert!(!store.select(&keyboard_id));
        assert!(!store.select("unknown"));
        assert_eq!(store.current_mode(), Some(ModelMode::Keyboard));
    }
}
