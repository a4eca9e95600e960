//! Model loading
//!
//! Loads the current model into the rig, sizes the window for it and fills
//! the model store with the model's motions, expressions and key artwork.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::host::{Notifier, ResourceResolver};
use crate::input::{Side, SupportedKeys};
use crate::rig::Rig;
use crate::stores::Stores;
use crate::window::{NaturalSize, WindowSizer};

/// Folder inside a model directory holding the key images
pub const KEY_RESOURCES_DIR: &str = "resources";

pub struct ModelLoader {
    rig: Arc<dyn Rig>,
    resources: Arc<dyn ResourceResolver>,
    notifier: Arc<dyn Notifier>,
}

impl ModelLoader {
    pub fn new(
        rig: Arc<dyn Rig>,
        resources: Arc<dyn ResourceResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            rig,
            resources,
            notifier,
        }
    }

    /// Load the current model
    ///
    /// Failures are reported through the notifier and leave the model store
    /// untouched. Returns whether a model was loaded.
    pub async fn load(&self, stores: &mut Stores, sizer: &mut WindowSizer) -> bool {
        let Some(model) = stores.model.current_model.clone() else {
            debug!("No current model to load");
            return false;
        };

        match self.try_load(&model.path, stores, sizer).await {
            Ok(()) => {
                info!(
                    "🐱 Loaded {} model ({} supported keys)",
                    model.mode,
                    stores.model.supported_keys.len()
                );
                true
            }
            Err(e) => {
                self.notifier.error(&format!("{:#}", e));
                false
            }
        }
    }

    async fn try_load(
        &self,
        model_path: &Path,
        stores: &mut Stores,
        sizer: &mut WindowSizer,
    ) -> Result<()> {
        let path = self
            .resources
            .resolve_resource(model_path)
            .await
            .with_context(|| format!("Failed to resolve model {}", model_path.display()))?;

        let loaded = self
            .rig
            .load(&path)
            .await
            .with_context(|| format!("Failed to load model {}", path.display()))?;

        let natural = NaturalSize::new(loaded.width, loaded.height);
        if let Err(e) = sizer.on_model_loaded(natural, &mut stores.cat).await {
            warn!("Failed to size window for model: {:#}", e);
        }

        let supported_keys = self.discover_keys(&path).await;

        let store = &mut stores.model;
        store.clear_loaded();
        store.motions = loaded.motions;
        store.expressions = loaded.expressions;
        store.supported_keys = supported_keys;

        Ok(())
    }

    /// Key images shipped with the model, by side
    ///
    /// A side whose folder cannot be listed contributes no keys.
    pub async fn discover_keys(&self, model_path: &Path) -> SupportedKeys {
        let mut keys = SupportedKeys::new();

        for side in [Side::Left, Side::Right] {
            let dir = model_path.join(KEY_RESOURCES_DIR).join(side.resource_dir());
            match self.resources.list_dir(&dir).await {
                Ok(files) => keys.extend_from_files(side, &dir, &files),
                Err(e) => debug!("No {} key images: {:#}", side.resource_dir(), e),
            }
        }

        keys
    }
}
