//! Animation rig abstraction
//!
//! The rendering library (Live2D) lives outside this crate. Everything the
//! input pipeline needs from it goes through the [`Rig`] trait: load a model,
//! query parameter ranges, write parameter values.

pub mod params;
pub mod recording;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub use recording::{ParameterWrite, RecordingRig};

/// Declared bounds of a model parameter
///
/// Either bound may be missing when the model does not define the parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ParameterRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Both bounds, if defined
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }

    /// Map a ratio onto the range, inverted: 0 gives `max`, 1 gives `min`
    pub fn inverted_lerp(&self, ratio: f64) -> Option<f64> {
        let (min, max) = self.bounds()?;
        Some(max - ratio * (max - min))
    }

    /// `max` when pressed, `min` otherwise
    pub fn pressed_value(&self, pressed: bool) -> Option<f64> {
        if pressed {
            self.max
        } else {
            self.min
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Motion {
    pub name: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default)]
    pub fade_in_time: f64,
    #[serde(default)]
    pub fade_out_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub type MotionGroups = BTreeMap<String, Vec<Motion>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Expression {
    pub name: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Result of loading a model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedModel {
    /// Natural width of the model canvas
    pub width: f64,
    /// Natural height of the model canvas
    pub height: f64,
    pub motions: MotionGroups,
    pub expressions: Vec<Expression>,
}

/// Animation library seam
///
/// All methods take `&self`; implementations use interior mutability so the
/// rig can be shared as `Arc<dyn Rig>`.
#[async_trait]
pub trait Rig: Send + Sync {
    /// Load the model found at `path`, replacing the current one
    async fn load(&self, path: &Path) -> Result<LoadedModel>;

    /// Declared range of a parameter
    fn parameter_range(&self, id: &str) -> ParameterRange;

    /// Write a parameter value
    fn set_parameter_value(&self, id: &str, value: f64);

    /// Write a boolean parameter
    fn set_parameter_flag(&self, id: &str, on: bool) {
        self.set_parameter_value(id, if on { 1.0 } else { 0.0 });
    }

    /// Fit the model into the current canvas
    fn fit_model(&self);

    /// Release the current model
    fn destroy(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_lerp() {
        let range = ParameterRange::new(0.0, 1.0);
        assert_eq!(range.inverted_lerp(0.0), Some(1.0));
        assert_eq!(range.inverted_lerp(1.0), Some(0.0));
        assert_eq!(range.inverted_lerp(0.25), Some(0.75));

        let range = ParameterRange::new(-30.0, 30.0);
        assert_eq!(range.inverted_lerp(0.5), Some(0.0));
    }

    #[test]
    fn test_undefined_bounds() {
        let range = ParameterRange {
            min: None,
            max: Some(1.0),
        };
        assert_eq!(range.bounds(), None);
        assert_eq!(range.inverted_lerp(0.5), None);
        assert_eq!(range.pressed_value(true), Some(1.0));
        assert_eq!(range.pressed_value(false), None);
    }
}
