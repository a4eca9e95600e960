//! Native gamepad listener using GilRs
//!
//! Polls gilrs on a dedicated thread (gilrs is not `Send`) and forwards button
//! and axis changes as `gamepad-changed` host messages. Names are the gilrs
//! enum variant names (`South`, `LeftThumb`, `LeftStickX`, ...).

use crate::input::{GamepadEvent, HostMessage};
use anyhow::Result;
use async_trait::async_trait;
use gilrs::{Event, EventType, Gilrs};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::NativeCommands;

/// Poll interval of the gilrs thread
const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Convert a gilrs event into a host gamepad event
pub fn convert_event(event: &EventType) -> Option<GamepadEvent> {
    match event {
        EventType::ButtonChanged(button, value, _) => {
            Some(GamepadEvent::button(format!("{:?}", button), f64::from(*value)))
        }
        EventType::AxisChanged(axis, value, _) => {
            Some(GamepadEvent::axis(format!("{:?}", axis), f64::from(*value)))
        }
        _ => None,
    }
}

/// Gamepad listener that can be started and stopped repeatedly
///
/// Every run owns its stop flag, so a run that was stopped keeps exiting even
/// when a new run starts before it polled the flag again.
pub struct GilrsListener {
    /// Stop flag of the current run
    current: Mutex<Option<Arc<AtomicBool>>>,
    event_tx: mpsc::UnboundedSender<HostMessage>,
}

type PollWorker = fn(Arc<AtomicBool>, mpsc::UnboundedSender<HostMessage>);

impl GilrsListener {
    pub fn new(event_tx: mpsc::UnboundedSender<HostMessage>) -> Self {
        Self {
            current: Mutex::new(None),
            event_tx,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|running| running.load(Ordering::SeqCst))
    }

    /// Start polling; no-op when already running
    pub fn start(&self) {
        self.start_with(Self::poll_loop);
    }

    fn start_with(&self, worker: PollWorker) {
        let mut current = self.current.lock();
        if current
            .as_ref()
            .is_some_and(|running| running.load(Ordering::SeqCst))
        {
            return;
        }

        let running = Arc::new(AtomicBool::new(true));
        *current = Some(running.clone());
        let event_tx = self.event_tx.clone();
        std::thread::spawn(move || worker(running, event_tx));
    }

    /// Ask the polling thread to exit at its next iteration
    pub fn stop(&self) {
        if let Some(running) = self.current.lock().take() {
            running.store(false, Ordering::SeqCst);
        }
    }

    fn poll_loop(running: Arc<AtomicBool>, event_tx: mpsc::UnboundedSender<HostMessage>) {
        let mut gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("GilRs initialized");
                g
            }
            Err(e) => {
                warn!("Failed to initialize GilRs: {:?}", e);
                running.store(false, Ordering::SeqCst);
                return;
            }
        };

        while running.load(Ordering::SeqCst) {
            while let Some(Event { event, .. }) = gilrs.next_event() {
                let Some(gamepad_event) = convert_event(&event) else {
                    continue;
                };
                if event_tx.send(HostMessage::GamepadChanged(gamepad_event)).is_err() {
                    debug!("Gamepad receiver dropped, stopping listener");
                    running.store(false, Ordering::SeqCst);
                    return;
                }
            }
            std::thread::sleep(POLL_INTERVAL);
        }

        debug!("Gamepad listener stopped");
    }
}

/// Native command handler for a headless process
///
/// Device events arrive over the stdin bridge, so device listening is only
/// tracked. Gamepad listening drives the optional gilrs listener.
pub struct NativeBridge {
    device_listening: AtomicBool,
    gamepad: Option<GilrsListener>,
}

impl NativeBridge {
    pub fn new(gamepad: Option<GilrsListener>) -> Self {
        Self {
            device_listening: AtomicBool::new(false),
            gamepad,
        }
    }

    pub fn is_device_listening(&self) -> bool {
        self.device_listening.load(Ordering::SeqCst)
    }

    pub fn is_gamepad_listening(&self) -> bool {
        self.gamepad.as_ref().is_some_and(GilrsListener::is_running)
    }
}

#[async_trait]
impl NativeCommands for NativeBridge {
    async fn start_device_listening(&self) -> Result<()> {
        if !self.device_listening.swap(true, Ordering::SeqCst) {
            info!("Device listening started");
        }
        Ok(())
    }

    async fn stop_device_listening(&self) -> Result<()> {
        if self.device_listening.swap(false, Ordering::SeqCst) {
            info!("Device listening stopped");
        }
        Ok(())
    }

    async fn start_gamepad_listening(&self) -> Result<()> {
        match &self.gamepad {
            Some(listener) => listener.start(),
            None => debug!("Native gamepad listener disabled, relying on host events"),
        }
        Ok(())
    }

    async fn stop_gamepad_listening(&self) -> Result<()> {
        if let Some(listener) = &self.gamepad {
            listener.stop();
        }
        Ok(())
    }
}
