//! Shared context/tray menu
//!
//! The host renders the menu; this module decides what it contains and how
//! an activated entry changes the cat preferences.

use serde::{Deserialize, Serialize};

use crate::stores::CatStore;

/// Scale choices in percent
pub const SCALE_OPTIONS: [u32; 5] = [50, 75, 100, 125, 150];

/// Opacity choices in percent
pub const OPACITY_OPTIONS: [u32; 4] = [25, 50, 75, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "kebab-case")]
pub enum MenuAction {
    OpenPreferences,
    ToggleVisible,
    TogglePassThrough,
    SetScale(u32),
    SetOpacity(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        text: String,
        accelerator: Option<String>,
        action: MenuAction,
    },
    Check {
        text: String,
        checked: bool,
        enabled: bool,
        action: Option<MenuAction>,
    },
    Separator,
    Submenu {
        text: String,
        items: Vec<MenuEntry>,
    },
}

/// What the runtime has to do after an action was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuOutcome {
    /// Preferences changed and should be persisted
    pub changed: bool,
    /// The window scale changed
    pub rescale: bool,
    /// The host should show the preference window
    pub open_preferences: bool,
}

/// Choice entries plus a disabled entry for an off-list current value
fn choice_items(
    options: &[u32],
    current: u32,
    label: impl Fn(u32) -> String,
    action: impl Fn(u32) -> MenuAction,
) -> Vec<MenuEntry> {
    let mut items: Vec<MenuEntry> = options
        .iter()
        .map(|&value| MenuEntry::Check {
            text: label(value),
            checked: value == current,
            enabled: true,
            action: Some(action(value)),
        })
        .collect();

    if !options.contains(&current) {
        items.insert(
            0,
            MenuEntry::Check {
                text: format!("{}%", current),
                checked: true,
                enabled: false,
                action: None,
            },
        );
    }

    items
}

pub fn scale_items(cat: &CatStore) -> Vec<MenuEntry> {
    choice_items(
        &SCALE_OPTIONS,
        cat.window.scale,
        |value| {
            if value == 100 {
                "Default".to_string()
            } else {
                format!("{}%", value)
            }
        },
        MenuAction::SetScale,
    )
}

pub fn opacity_items(cat: &CatStore) -> Vec<MenuEntry> {
    choice_items(
        &OPACITY_OPTIONS,
        cat.window.opacity,
        |value| format!("{}%", value),
        MenuAction::SetOpacity,
    )
}

/// Build the shared menu for the current preferences
pub fn shared_menu(cat: &CatStore, is_mac: bool) -> Vec<MenuEntry> {
    vec![
        MenuEntry::Item {
            text: "Preferences...".to_string(),
            accelerator: is_mac.then(|| "Cmd+,".to_string()),
            action: MenuAction::OpenPreferences,
        },
        MenuEntry::Item {
            text: if cat.window.visible { "Hide Cat" } else { "Show Cat" }.to_string(),
            accelerator: None,
            action: MenuAction::ToggleVisible,
        },
        MenuEntry::Separator,
        MenuEntry::Check {
            text: "Click Through".to_string(),
            checked: cat.window.pass_through,
            enabled: true,
            action: Some(MenuAction::TogglePassThrough),
        },
        MenuEntry::Submenu {
            text: "Window Size".to_string(),
            items: scale_items(cat),
        },
        MenuEntry::Submenu {
            text: "Opacity".to_string(),
            items: opacity_items(cat),
        },
    ]
}

/// Apply an activated entry to the preferences
pub fn apply(action: MenuAction, cat: &mut CatStore) -> MenuOutcome {
    match action {
        MenuAction::OpenPreferences => MenuOutcome {
            open_preferences: true,
            ..MenuOutcome::default()
        },
        MenuAction::ToggleVisible => {
            cat.window.visible = !cat.window.visible;
            MenuOutcome {
                changed: true,
                ..MenuOutcome::default()
            }
        }
        MenuAction::TogglePassThrough => {
            cat.window.pass_through = !cat.window.pass_through;
            MenuOutcome {
                changed: true,
                ..MenuOutcome::default()
            }
        }
        MenuAction::SetScale(scale) => {
            let changed = cat.set_scale(scale);
            MenuOutcome {
                changed,
                rescale: changed,
                ..MenuOutcome::default()
            }
        }
        MenuAction::SetOpacity(opacity) => {
            let changed = cat.window.opacity != opacity;
            cat.window.opacity = opacity;
            MenuOutcome {
                changed,
                ..MenuOutcome::default()
            }
        }
    }
}

/// Plain-text rendering, one line per entry
pub fn render(entries: &[MenuEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(entries, 0, &mut lines);
    lines
}

fn render_into(entries: &[MenuEntry], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for entry in entries {
        match entry {
            MenuEntry::Item {
                text, accelerator, ..
            } => match accelerator {
                Some(acc) => lines.push(format!("{}{}  ({})", indent, text, acc)),
                None => lines.push(format!("{}{}", indent, text)),
            },
            MenuEntry::Check {
                text,
                checked,
                enabled,
                ..
            } => {
                let mark = if *checked { "[x]" } else { "[ ]" };
                let suffix = if *enabled { "" } else { " (disabled)" };
                lines.push(format!("{}{} {}{}", indent, mark, text, suffix));
            }
            MenuEntry::Separator => lines.push(format!("{}----", indent)),
            MenuEntry::Submenu { text, items } => {
                lines.push(format!("{}{} >", indent, text));
                render_into(items, depth + 1, lines);
            }
        }
    }
}
