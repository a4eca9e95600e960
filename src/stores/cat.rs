//! Cat appearance preferences

use serde::{Deserialize, Serialize};

/// Window scale in percent
pub const DEFAULT_SCALE: u32 = 100;

/// Window opacity in percent
pub const DEFAULT_OPACITY: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatWindow {
    pub visible: bool,
    pub pass_through: bool,
    pub scale: u32,
    pub opacity: u32,
}

impl Default for CatWindow {
    fn default() -> Self {
        Self {
            visible: true,
            pass_through: false,
            scale: DEFAULT_SCALE,
            opacity: DEFAULT_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatStore {
    pub window: CatWindow,
    /// Mirror horizontal mouse tracking
    pub mouse_mirror: bool,
}

impl CatStore {
    /// Update the scale, returning whether it changed
    pub fn set_scale(&mut self, scale: u32) -> bool {
        if self.window.scale == scale {
            return false;
        }
        self.window.scale = scale;
        true
    }
}
