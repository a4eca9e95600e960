//! General application preferences
//!
//! Older versions persisted these as flat fields (`autostart`,
//! `taskbarVisibility`, `theme`, `isDark`, `autoCheckUpdate`). They are still
//! accepted on load and folded into the nested layout by [`GeneralStore::init`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppPrefs {
    pub autostart: bool,
    pub taskbar_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppearancePrefs {
    pub theme: Theme,
    pub is_dark: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePrefs {
    pub auto_check: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralStore {
    pub app: AppPrefs,
    pub appearance: AppearancePrefs,
    pub update: UpdatePrefs,

    #[serde(skip_serializing)]
    auto_check_update: Option<bool>,
    #[serde(skip_serializing)]
    autostart: Option<bool>,
    #[serde(skip_serializing)]
    taskbar_visibility: Option<bool>,
    #[serde(skip_serializing)]
    theme: Option<Theme>,
    #[serde(skip_serializing)]
    is_dark: Option<bool>,
}

impl GeneralStore {
    /// Fold legacy flat fields into the nested layout
    pub fn init(&mut self) {
        if let Some(autostart) = self.autostart.take() {
            self.app.autostart = autostart;
        }
        if let Some(visible) = self.taskbar_visibility.take() {
            self.app.taskbar_visible = visible;
        }
        if let Some(theme) = self.theme.take() {
            self.appearance.theme = theme;
        }
        if let Some(is_dark) = self.is_dark.take() {
            self.appearance.is_dark = is_dark;
        }
        if let Some(auto_check) = self.auto_check_update.take() {
            self.update.auto_check = auto_check;
        }
    }
}
