//! Persisted subset of the stores
//!
//! Only user preferences and the model list survive a restart; loaded model
//! data and key state are rebuilt at runtime.

use super::cat::CatStore;
use super::general::GeneralStore;
use super::model::Model;
use super::Stores;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Snapshot format version
    pub version: String,
    /// Milliseconds since epoch
    pub timestamp: i64,
    #[serde(default)]
    pub cat: CatStore,
    #[serde(default)]
    pub general: GeneralStore,
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub current_model: Option<Model>,
}

impl PersistedState {
    /// Current snapshot format version
    pub const VERSION: &'static str = "1.0.0";

    pub fn from_stores(stores: &Stores) -> Self {
        Self {
            version: Self::VERSION.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            cat: stores.cat.clone(),
            general: stores.general.clone(),
            models: stores.model.models.clone(),
            current_model: stores.model.current_model.clone(),
        }
    }

    /// Hydrate the stores; the caller runs the store `init` steps afterwards
    pub fn apply_to(self, stores: &mut Stores) {
        stores.cat = self.cat;
        stores.general = self.general;
        stores.model.models = self.models;
        stores.model.current_model = self.current_model;
    }
}
