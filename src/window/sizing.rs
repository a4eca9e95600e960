//! Window sizing policy
//!
//! The window keeps the aspect ratio of the loaded model, and its physical
//! size is `natural size * scale / 100`. The two directions feed each other:
//! a resize recomputes the persisted scale, and a scale change resizes the
//! window. Sizes are only written when they differ from the current ones, so
//! the loop settles after one round.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::host::{LogicalSize, PhysicalSize, WindowHost};
use crate::rig::Rig;
use crate::stores::CatStore;

/// Natural canvas size of a loaded model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalSize {
    pub width: f64,
    pub height: f64,
}

impl NaturalSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Physical window size for a scale in percent
    pub fn scaled(&self, scale: u32) -> PhysicalSize {
        let factor = f64::from(scale) / 100.0;
        PhysicalSize {
            width: (self.width * factor).round() as u32,
            height: (self.height * factor).round() as u32,
        }
    }
}

/// Aspect ratio compared at one decimal
fn aspect_tenths(width: f64, height: f64) -> i64 {
    ((width / height) * 10.0).round() as i64
}

pub struct WindowSizer {
    window: Arc<dyn WindowHost>,
    rig: Arc<dyn Rig>,
    natural: Option<NaturalSize>,
}

impl WindowSizer {
    pub fn new(window: Arc<dyn WindowHost>, rig: Arc<dyn Rig>) -> Self {
        Self {
            window,
            rig,
            natural: None,
        }
    }

    pub fn natural_size(&self) -> Option<NaturalSize> {
        self.natural
    }

    /// Size the window for a freshly loaded model
    ///
    /// Fits the window to the model's aspect ratio, derives the scale from the
    /// resulting width, then applies the scale once.
    pub async fn on_model_loaded(&mut self, natural: NaturalSize, cat: &mut CatStore) -> Result<()> {
        self.natural = Some(natural).filter(NaturalSize::is_valid);

        self.handle_resize(cat).await?;
        self.apply_scale(cat.window.scale).await?;
        Ok(())
    }

    /// React to a window resize
    ///
    /// Returns whether the persisted scale changed.
    pub async fn handle_resize(&self, cat: &mut CatStore) -> Result<bool> {
        let Some(natural) = self.natural else {
            return Ok(false);
        };

        self.rig.fit_model();

        let inner = self
            .window
            .inner_size()
            .await
            .context("Failed to read window inner size")?;

        if inner.height > 0.0
            && aspect_tenths(inner.width, inner.height) != aspect_tenths(natural.width, natural.height)
        {
            let fitted = LogicalSize {
                width: inner.width,
                height: (inner.width * natural.height / natural.width).ceil(),
            };
            debug!(
                "Aspect ratio mismatch, resizing window to {}x{}",
                fitted.width, fitted.height
            );
            self.window
                .set_logical_size(fitted)
                .await
                .context("Failed to set window logical size")?;
        }

        let size = self.window.size().await.context("Failed to read window size")?;
        let scale = (f64::from(size.width) / natural.width * 100.0).round() as u32;

        let changed = cat.set_scale(scale);
        if changed {
            info!("📐 Window scale is now {}%", scale);
        }
        Ok(changed)
    }

    /// Resize the window for a scale in percent
    ///
    /// Returns whether a resize was issued.
    pub async fn apply_scale(&self, scale: u32) -> Result<bool> {
        let Some(natural) = self.natural else {
            return Ok(false);
        };

        let target = natural.scaled(scale);
        let current = self.window.size().await.context("Failed to read window size")?;
        if current == target {
            return Ok(false);
        }

        debug!(
            "Scaling window to {}x{} ({}%)",
            target.width, target.height, scale
        );
        self.window
            .set_physical_size(target)
            .await
            .context("Failed to set window size")?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessWindow;
    use crate::rig::RecordingRig;

    fn setup(
        width: f64,
        height: f64,
        scale_factor: f64,
    ) -> (Arc<HeadlessWindow>, Arc<RecordingRig>, WindowSizer) {
        let window = Arc::new(HeadlessWindow::new(width, height, scale_factor, vec![]));
        let rig = Arc::new(RecordingRig::new(800.0, 600.0));
        let sizer = WindowSizer::new(window.clone(), rig.clone());
        (window, rig, sizer)
    }

    #[tokio::test]
    async fn test_apply_scale_is_idempotent() {
        let (window, _rig, mut sizer) = setup(800.0, 600.0, 1.0);
        sizer.natural = Some(NaturalSize::new(800.0, 600.0));

        assert!(!sizer.apply_scale(100).await.unwrap());
        let first = window.size().await.unwrap();
        assert!(!sizer.apply_scale(100).await.unwrap());
        let second = window.size().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, PhysicalSize { width: 800, height: 600 });
        assert_eq!(window.resize_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_scale_converges_in_one_write() {
        let (window, _rig, mut sizer) = setup(400.0, 400.0, 1.0);
        sizer.natural = Some(NaturalSize::new(800.0, 600.0));

        assert!(sizer.apply_scale(100).await.unwrap());
        let first = window.size().await.unwrap();
        assert!(!sizer.apply_scale(100).await.unwrap());

        assert_eq!(first, window.size().await.unwrap());
        assert_eq!(window.resize_count(), 1);
    }

    #[tokio::test]
    async fn test_handle_resize_fixes_aspect_ratio() {
        let (window, rig, mut sizer) = setup(612.0, 300.0, 1.0);
        sizer.natural = Some(NaturalSize::new(612.0, 354.0));
        let mut cat = CatStore::default();

        let changed = sizer.handle_resize(&mut cat).await.unwrap();

        assert!(!changed);
        assert_eq!(cat.window.scale, 100);
        assert_eq!(window.logical(), LogicalSize { width: 612.0, height: 354.0 });
        assert_eq!(rig.fit_count(), 1);
    }

    #[tokio::test]
    async fn test_handle_resize_uses_physical_width() {
        let (window, _rig, mut sizer) = setup(400.0, 300.0, 2.0);
        sizer.natural = Some(NaturalSize::new(400.0, 300.0));
        let mut cat = CatStore::default();

        assert!(sizer.handle_resize(&mut cat).await.unwrap());
        assert_eq!(cat.window.scale, 200);
        // Same aspect ratio, no logical resize
        assert_eq!(window.resize_count(), 0);
    }

    #[tokio::test]
    async fn test_model_load_settles() {
        let (window, _rig, mut sizer) = setup(300.0, 300.0, 1.0);
        let mut cat = CatStore::default();
        cat.window.scale = 150;

        sizer
            .on_model_loaded(NaturalSize::new(800.0, 600.0), &mut cat)
            .await
            .unwrap();

        assert_eq!(cat.window.scale, 38);
        assert_eq!(window.size().await.unwrap(), PhysicalSize { width: 304, height: 228 });

        // A resize event echoing our own write changes nothing
        let writes = window.resize_count();
        assert!(!sizer.handle_resize(&mut cat).await.unwrap());
        assert!(!sizer.apply_scale(cat.window.scale).await.unwrap());
        assert_eq!(window.resize_count(), writes);
    }

    #[tokio::test]
    async fn test_nothing_happens_without_model() {
        let (window, rig, sizer) = setup(300.0, 300.0, 1.0);
        let mut cat = CatStore::default();

        assert!(!sizer.handle_resize(&mut cat).await.unwrap());
        assert!(!sizer.apply_scale(150).await.unwrap());
        assert_eq!(window.resize_count(), 0);
        assert_eq!(rig.fit_count(), 0);
    }
}
