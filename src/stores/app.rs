//! Application metadata

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStore {
    pub name: String,
    pub version: String,
}

impl AppStore {
    /// Metadata of the running binary
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::current()
    }
}
