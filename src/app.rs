//! Runtime - owns the stores and processes host messages in order
//!
//! Everything that mutates state runs on one task: host messages, fired
//! release timers and config reloads are multiplexed with `tokio::select!`
//! and each handler runs to completion before the next one starts.

use anyhow::{bail, Result};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ConfigWatcher};
use crate::host::{
    FsResources, HeadlessWindow, LogNotifier, NativeCommands, Notifier, ResourceResolver,
    WindowHost,
};
use crate::input::{HostMessage, ReleaseFired};
use crate::mapper::InputMapper;
use crate::menu::{self, MenuAction, MenuEntry};
use crate::model::ModelLoader;
use crate::rig::{RecordingRig, Rig};
use crate::stores::{ModelMode, PersistenceHandle, Stores};
use crate::window::WindowSizer;

/// Parameter writes the headless rig keeps for debugging
const HEADLESS_WRITE_HISTORY: usize = 256;

/// External capabilities the runtime drives
#[derive(Clone)]
pub struct AppServices {
    pub rig: Arc<dyn Rig>,
    pub window: Arc<dyn WindowHost>,
    pub native: Arc<dyn NativeCommands>,
    pub resources: Arc<dyn ResourceResolver>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppServices {
    /// Services for running without a desktop shell
    pub fn headless(
        config: &AppConfig,
        resources_dir: PathBuf,
        native: Arc<dyn NativeCommands>,
    ) -> Self {
        let headless = &config.headless;
        Self {
            rig: Arc::new(
                RecordingRig::new(headless.model_size.width, headless.model_size.height)
                    .with_default_ranges()
                    .with_history(HEADLESS_WRITE_HISTORY),
            ),
            window: Arc::new(HeadlessWindow::new(
                headless.window.width,
                headless.window.height,
                headless.scale_factor,
                headless.monitors.clone(),
            )),
            native,
            resources: Arc::new(FsResources::new(resources_dir)),
            notifier: Arc::new(LogNotifier),
        }
    }
}

pub struct App {
    config: AppConfig,
    stores: Stores,
    mapper: InputMapper,
    /// Taken by `run`
    fired_rx: Option<mpsc::UnboundedReceiver<ReleaseFired>>,
    sizer: WindowSizer,
    loader: ModelLoader,
    rig: Arc<dyn Rig>,
    native: Arc<dyn NativeCommands>,
    persistence: Option<PersistenceHandle>,
    /// Last gamepad listening state successfully requested
    gamepad_listening: Option<bool>,
}

impl App {
    pub fn new(
        config: AppConfig,
        stores: Stores,
        services: AppServices,
        persistence: Option<PersistenceHandle>,
    ) -> Self {
        let (mapper, fired_rx) = InputMapper::new(
            services.rig.clone(),
            services.window.clone(),
            config.keyboard.clone(),
        );
        let sizer = WindowSizer::new(services.window.clone(), services.rig.clone());
        let loader = ModelLoader::new(
            services.rig.clone(),
            services.resources.clone(),
            services.notifier.clone(),
        );

        Self {
            config,
            stores,
            mapper,
            fired_rx: Some(fired_rx),
            sizer,
            loader,
            rig: services.rig,
            native: services.native,
            persistence,
            gamepad_listening: None,
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn mapper(&self) -> &InputMapper {
        &self.mapper
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared menu for the current preferences
    pub fn menu(&self) -> Vec<MenuEntry> {
        menu::shared_menu(&self.stores.cat, cfg!(target_os = "macos"))
    }

    /// Start listening and load the current model
    pub async fn start(&mut self) {
        self.mapper.refresh_monitors().await;

        if let Err(e) = self.native.start_device_listening().await {
            warn!("Failed to start device listening: {:#}", e);
        }

        self.loader.load(&mut self.stores, &mut self.sizer).await;
        self.sync_gamepad_listening().await;
        self.persist().await;
    }

    /// Run the event loop until shutdown or until the host channel closes
    ///
    /// Returns the final stores.
    pub async fn run(
        mut self,
        mut host_rx: mpsc::UnboundedReceiver<HostMessage>,
        mut config_watcher: Option<ConfigWatcher>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<Stores> {
        let Some(mut fired_rx) = self.fired_rx.take() else {
            bail!("App is already running");
        };

        self.start().await;
        info!("🐾 Ready to process host events");

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                message = host_rx.recv() => match message {
                    Some(message) => self.handle_message(message).await,
                    None => {
                        info!("Host channel closed, stopping event loop");
                        break;
                    }
                },

                Some(fired) = fired_rx.recv() => {
                    self.mapper.handle_release_fired(fired, &mut self.stores.model);
                }

                Some(config) = next_config(&mut config_watcher) => {
                    info!("📝 Configuration file changed, applying...");
                    self.apply_config(config).await;
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping event loop");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(self.stores)
    }

    /// Process one host message
    pub async fn handle_message(&mut self, message: HostMessage) {
        match message {
            HostMessage::DeviceChanged(event) => {
                self.mapper.handle_device_event(event, &mut self.stores).await;
            }
            HostMessage::GamepadChanged(event) => {
                if self.config.gamepad.enabled {
                    self.mapper
                        .handle_gamepad_event(&event, &mut self.stores.model);
                }
            }
            HostMessage::SelectModel(id) => self.select_model(&id).await,
            HostMessage::Menu(action) => self.handle_menu(action).await,
            HostMessage::WindowResized => self.handle_window_resized().await,
            HostMessage::MonitorsChanged => self.mapper.refresh_monitors().await,
        }
    }

    async fn select_model(&mut self, id: &str) {
        if !self.stores.model.select(id) {
            debug!("Model {} is unknown or already current", id);
            return;
        }

        self.loader.load(&mut self.stores, &mut self.sizer).await;
        self.sync_gamepad_listening().await;
        self.persist().await;
    }

    async fn handle_menu(&mut self, action: MenuAction) {
        let outcome = menu::apply(action, &mut self.stores.cat);
        debug!("Menu action {:?}: {:?}", action, outcome);

        if outcome.open_preferences {
            info!("Preferences requested");
        }
        if outcome.rescale {
            if let Err(e) = self.sizer.apply_scale(self.stores.cat.window.scale).await {
                warn!("Failed to apply window scale: {:#}", e);
            }
        }
        if outcome.changed {
            self.persist().await;
        }
    }

    async fn handle_window_resized(&mut self) {
        match self.sizer.handle_resize(&mut self.stores.cat).await {
            Ok(true) => {
                if let Err(e) = self.sizer.apply_scale(self.stores.cat.window.scale).await {
                    warn!("Failed to apply window scale: {:#}", e);
                }
                self.persist().await;
            }
            Ok(false) => {}
            Err(e) => warn!("Failed to handle window resize: {:#}", e),
        }
    }

    /// Apply a reloaded configuration
    ///
    /// Keyboard and gamepad settings take effect immediately; window geometry,
    /// resources and persistence settings need a restart.
    pub async fn apply_config(&mut self, config: AppConfig) {
        self.mapper.update_keyboard_config(config.keyboard.clone());

        if config.headless != self.config.headless
            || config.resources_dir != self.config.resources_dir
            || config.persistence != self.config.persistence
        {
            info!("Some configuration changes take effect after a restart");
        }

        let gamepad_changed = config.gamepad != self.config.gamepad;
        self.config = config;
        if gamepad_changed {
            self.sync_gamepad_listening().await;
        }
    }

    /// Listen to gamepads only while a gamepad model is current
    async fn sync_gamepad_listening(&mut self) {
        let wanted = self.config.gamepad.enabled
            && self.stores.model.current_mode() == Some(ModelMode::Gamepad);
        if self.gamepad_listening == Some(wanted) {
            return;
        }

        let result = if wanted {
            self.native.start_gamepad_listening().await
        } else {
            self.native.stop_gamepad_listening().await
        };

        match result {
            Ok(()) => {
                info!(
                    "🎮 Gamepad listening {}",
                    if wanted { "started" } else { "stopped" }
                );
                self.gamepad_listening = Some(wanted);
            }
            Err(e) => warn!("Failed to switch gamepad listening: {:#}", e),
        }
    }

    async fn persist(&self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        if let Err(e) = persistence.save(self.stores.snapshot()).await {
            warn!("Failed to queue preferences: {:#}", e);
        }
    }

    /// Cancel timers, stop listening, release the model and flush preferences
    pub async fn shutdown(&mut self) {
        info!("Shutting down...");
        self.mapper.cancel_all();

        if let Err(e) = self.native.stop_device_listening().await {
            warn!("Failed to stop device listening: {:#}", e);
        }
        if self.gamepad_listening == Some(true) {
            if let Err(e) = self.native.stop_gamepad_listening().await {
                warn!("Failed to stop gamepad listening: {:#}", e);
            }
            self.gamepad_listening = Some(false);
        }

        self.rig.destroy();

        if let Some(persistence) = &self.persistence {
            self.persist().await;
            if let Err(e) = persistence.flush().await {
                warn!("Failed to flush preferences: {:#}", e);
            }
            persistence.shutdown();
        }
    }
}

async fn next_config(watcher: &mut Option<ConfigWatcher>) -> Option<AppConfig> {
    match watcher {
        Some(watcher) => watcher.next_config().await,
        None => std::future::pending().await,
    }
}
