//! Recording rig - logs every parameter write
//!
//! Stands in for the rendering library when running headless:
//! - Running the runtime without a renderer attached
//! - Inspecting parameter writes in tests
//! - Debugging the input mapping

use super::{params, LoadedModel, ParameterRange, Rig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One recorded parameter write
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterWrite {
    pub id: String,
    pub value: f64,
}

#[derive(Default)]
struct RigState {
    loaded: Option<PathBuf>,
    writes: VecDeque<ParameterWrite>,
    fit_count: u64,
}

/// Rig that records writes instead of rendering them
pub struct RecordingRig {
    ranges: HashMap<String, ParameterRange>,
    model_size: (f64, f64),
    /// Maximum number of writes kept, unbounded when `None`
    history: Option<usize>,
    state: Mutex<RigState>,
}

impl RecordingRig {
    /// Create a rig whose models all have the given natural size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            ranges: HashMap::new(),
            model_size: (width, height),
            history: None,
            state: Mutex::new(RigState::default()),
        }
    }

    /// Declare the ranges the bundled cat models use
    pub fn with_default_ranges(self) -> Self {
        self.with_range(params::MOUSE_X, -1.0, 1.0)
            .with_range(params::MOUSE_Y, -1.0, 1.0)
            .with_range(params::ANGLE_X, -30.0, 30.0)
            .with_range(params::ANGLE_Y, -30.0, 30.0)
            .with_range(params::MOUSE_LEFT_DOWN, 0.0, 1.0)
            .with_range(params::MOUSE_RIGHT_DOWN, 0.0, 1.0)
            .with_range(params::LEFT_HAND_DOWN, 0.0, 1.0)
            .with_range(params::RIGHT_HAND_DOWN, 0.0, 1.0)
    }

    /// Keep only the most recent `capacity` writes
    pub fn with_history(mut self, capacity: usize) -> Self {
        self.history = Some(capacity);
        self
    }

    pub fn with_range(mut self, id: &str, min: f64, max: f64) -> Self {
        self.ranges.insert(id.to_string(), ParameterRange::new(min, max));
        self
    }

    /// Retained writes, oldest first
    pub fn writes(&self) -> Vec<ParameterWrite> {
        self.state.lock().writes.iter().cloned().collect()
    }

    /// Writes to one parameter, oldest first
    pub fn writes_for(&self, id: &str) -> Vec<f64> {
        self.state
            .lock()
            .writes
            .iter()
            .filter(|w| w.id == id)
            .map(|w| w.value)
            .collect()
    }

    /// Most recent value written to a parameter
    pub fn last_value(&self, id: &str) -> Option<f64> {
        self.state
            .lock()
            .writes
            .iter()
            .rev()
            .find(|w| w.id == id)
            .map(|w| w.value)
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().writes.len()
    }

    pub fn clear_writes(&self) {
        self.state.lock().writes.clear();
    }

    pub fn loaded_path(&self) -> Option<PathBuf> {
        self.state.lock().loaded.clone()
    }

    pub fn fit_count(&self) -> u64 {
        self.state.lock().fit_count
    }
}

#[async_trait]
impl Rig for RecordingRig {
    async fn load(&self, path: &Path) -> Result<LoadedModel> {
        tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Model not found: {}", path.display()))?;

        info!("🐱 RecordingRig loaded model {}", path.display());
        self.state.lock().loaded = Some(path.to_path_buf());

        let (width, height) = self.model_size;
        Ok(LoadedModel {
            width,
            height,
            ..LoadedModel::default()
        })
    }

    fn parameter_range(&self, id: &str) -> ParameterRange {
        self.ranges.get(id).copied().unwrap_or_default()
    }

    fn set_parameter_value(&self, id: &str, value: f64) {
        debug!(
            "🎛️  [{}] {} = {:.3}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            id,
            value
        );
        let mut state = self.state.lock();
        state.writes.push_back(ParameterWrite {
            id: id.to_string(),
            value,
        });
        if let Some(capacity) = self.history {
            while state.writes.len() > capacity {
                state.writes.pop_front();
            }
        }
    }

    fn fit_model(&self) {
        self.state.lock().fit_count += 1;
    }

    fn destroy(&self) {
        if let Some(path) = self.state.lock().loaded.take() {
            info!("RecordingRig released model {}", path.display());
        }
    }
}
