//! Configuration file watcher for hot-reload support

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppConfig;

/// Delay before re-reading, so the writer can finish
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(100);

/// Config watcher that monitors file changes and sends reload notifications
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<AppConfig>,
}

impl ConfigWatcher {
    /// Watch an existing config file
    ///
    /// Only valid configurations are forwarded; a broken edit is logged and the
    /// previous configuration stays in effect.
    pub fn new(config_path: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel(10);
        let path: PathBuf = config_path.to_path_buf();
        let callback_path = path.clone();

        // notify callbacks run on their own OS thread, outside the runtime
        let runtime_handle = tokio::runtime::Handle::current();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Modify(_)) {
                        return;
                    }
                    debug!("Config file modified: {:?}", event.paths);

                    let path = callback_path.clone();
                    let tx = tx.clone();
                    runtime_handle.spawn(async move {
                        tokio::time::sleep(RELOAD_DEBOUNCE).await;

                        match AppConfig::load(&path).await {
                            Ok(config) => {
                                info!("🔄 Configuration reloaded");
                                if let Err(e) = tx.send(config).await {
                                    error!("Failed to send config update: {}", e);
                                }
                            }
                            Err(e) => {
                                warn!("Failed to reload config (keeping old config): {:#}", e);
                            }
                        }
                    });
                }
                Err(e) => error!("Watch error: {}", e),
            }
        })?;

        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config file: {}", path.display()))?;

        info!("Config file watcher started for: {}", path.display());

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next config update
    ///
    /// Returns `None` once the watcher has been closed.
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        self.rx.recv().await
    }
}
