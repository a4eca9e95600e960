//! UI state owned by the runtime
//!
//! Each store is a plain struct. The runtime owns one [`Stores`] value and
//! hands out references to the components that read or mutate it; there are
//! no global singletons.

pub mod app;
pub mod cat;
pub mod general;
pub mod model;
pub mod persistence_actor;
pub mod snapshot;

use std::path::Path;

pub use app::AppStore;
pub use cat::{CatStore, CatWindow};
pub use general::{GeneralStore, Theme};
pub use model::{Model, ModelMode, ModelStore};
pub use persistence_actor::{PersistenceHandle, DEFAULT_DEBOUNCE_MS};
pub use snapshot::PersistedState;

#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub app: AppStore,
    pub general: GeneralStore,
    pub cat: CatStore,
    pub model: ModelStore,
}

impl Stores {
    /// Build the stores from persisted state (if any) and run their init steps
    pub fn initialize(persisted: Option<PersistedState>, models_root: &Path) -> Self {
        let mut stores = Self::default();
        if let Some(state) = persisted {
            state.apply_to(&mut stores);
        }
        stores.general.init();
        stores.model.init(models_root);
        stores
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState::from_stores(self)
    }
}
