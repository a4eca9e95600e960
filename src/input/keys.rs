//! Key normalization
//!
//! Native hooks report very specific key identifiers (`ShiftLeft`, `F11`,
//! `ControlRight`, ...) while a model usually only ships artwork for a handful
//! of generic keys. Normalization collapses an unsupported key into its family
//! so that e.g. every function key lights up the `Fn` key image.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::hash::BuildHasher;
use std::path::PathBuf;

/// Generic identifier for the function-key family
pub const FUNCTION_KEY: &str = "Fn";

/// Key that never delivers a hardware release event
pub const CAPS_LOCK: &str = "CapsLock";

/// Modifier families collapsed to their bare prefix
const MODIFIER_PREFIXES: [&str; 4] = ["Meta", "Shift", "Alt", "Control"];

/// Anything that can answer "does the current model support this key?"
pub trait KeyLookup {
    fn supports(&self, key: &str) -> bool;
}

impl<S: BuildHasher> KeyLookup for HashSet<String, S> {
    fn supports(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl KeyLookup for [&str] {
    fn supports(&self, key: &str) -> bool {
        self.contains(&key)
    }
}

/// Normalize a raw key identifier against the supported key set
///
/// Returns `None` only for an empty identifier; unknown keys are returned
/// unchanged and the caller decides whether to drop them.
pub fn normalize_key<L: KeyLookup + ?Sized>(raw: &str, supported: &L) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    if supported.supports(raw) {
        return Some(raw.to_string());
    }

    if is_function_key(raw) {
        return Some(FUNCTION_KEY.to_string());
    }

    if let Some(prefix) = MODIFIER_PREFIXES.iter().find(|p| raw.starts_with(*p)) {
        return Some((*prefix).to_string());
    }

    Some(raw.to_string())
}

/// `F` followed by one or more digits
fn is_function_key(key: &str) -> bool {
    key.strip_prefix('F')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Which paw a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sub-directory of a model's `resources` folder listing the key images
    pub fn resource_dir(self) -> &'static str {
        match self {
            Side::Left => "left-keys",
            Side::Right => "right-keys",
        }
    }
}

/// A key the current model has artwork for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedKey {
    pub side: Side,
    pub image: PathBuf,
}

/// Keys supported by the loaded model, keyed by identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedKeys {
    keys: BTreeMap<String, SupportedKey>,
}

impl SupportedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every image file in `files` under the given side
    ///
    /// The identifier is the file name without its extension, so
    /// `left-keys/KeyA.png` becomes `KeyA`.
    pub fn extend_from_files(&mut self, side: Side, dir: &std::path::Path, files: &[String]) {
        for file in files {
            let stem = std::path::Path::new(file)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            if stem.is_empty() {
                continue;
            }
            self.keys.insert(
                stem.to_string(),
                SupportedKey {
                    side,
                    image: dir.join(file),
                },
            );
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, supported: SupportedKey) {
        self.keys.insert(key.into(), supported);
    }

    pub fn get(&self, key: &str) -> Option<&SupportedKey> {
        self.keys.get(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl KeyLookup for SupportedKeys {
    fn supports(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }
}
