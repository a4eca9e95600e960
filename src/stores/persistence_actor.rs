//! Debounced preference persistence backed by sled
//!
//! Preference changes (scale from a window resize, menu toggles, model
//! selection) tend to arrive in bursts. The actor keeps only the newest
//! [`PersistedState`] and writes it once no new save has arrived for the
//! debounce window. `flush` and `shutdown` write any pending state
//! immediately.

use super::snapshot::PersistedState;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// sled key holding the serialized preferences
const STATE_KEY: &[u8] = b"persisted_state";

#[derive(Debug)]
enum Command {
    Save(PersistedState),
    Load(oneshot::Sender<Option<PersistedState>>),
    Flush(oneshot::Sender<Result<()>>),
    Shutdown,
}

struct PersistenceActor {
    db: sled::Db,
    rx: mpsc::Receiver<Command>,
    pending: Option<PersistedState>,
    /// When the pending state should be written
    deadline: Option<Instant>,
    debounce: Duration,
    write_count: u64,
}

/// Handle to the persistence actor, cheap to clone
#[derive(Clone)]
pub struct PersistenceHandle {
    tx: mpsc::Sender<Command>,
}

impl PersistenceHandle {
    /// Open the database and spawn the actor
    ///
    /// A `debounce_ms` of 0 writes every save immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the sled database cannot be opened.
    pub fn spawn(db_path: &Path, debounce_ms: u64) -> Result<Self> {
        let db = sled::open(db_path)
            .with_context(|| format!("Failed to open sled database at: {}", db_path.display()))?;

        info!("Preferences database opened at: {}", db_path.display());

        let (tx, rx) = mpsc::channel(64);
        let actor = PersistenceActor {
            db,
            rx,
            pending: None,
            deadline: None,
            debounce: Duration::from_millis(debounce_ms),
            write_count: 0,
        };
        tokio::spawn(actor.run());

        Ok(Self { tx })
    }

    /// Queue a state for writing (debounced, last write wins)
    pub async fn save(&self, state: PersistedState) -> Result<()> {
        self.tx
            .send(Command::Save(state))
            .await
            .context("Failed to send save command: actor shut down")
    }

    /// The state currently on disk (pending saves are not included)
    pub async fn load(&self) -> Result<Option<PersistedState>> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Command::Load(tx))
            .await
            .context("Failed to send load command: actor shut down")?;

        rx.await.context("Failed to receive load response")
    }

    /// Write any pending state now
    pub async fn flush(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(tx))
            .await
            .context("Failed to send flush command: actor shut down")?;

        rx.await.context("Failed to receive flush response")?
    }

    /// Ask the actor to write pending state and stop
    pub fn shutdown(&self) {
        let _ = self.tx.try_send(Command::Shutdown);
    }
}

impl PersistenceActor {
    async fn run(mut self) {
        debug!("Persistence actor started (debounce: {:?})", self.debounce);

        loop {
            let deadline = self.deadline;
            tokio::select! {
                cmd = self.rx.recv() => {
                    let Some(cmd) = cmd else {
                        // Every handle dropped
                        if let Err(e) = self.write_pending().await {
                            error!("Failed to write preferences on close: {:#}", e);
                        }
                        return;
                    };
                    match cmd {
                        Command::Save(state) => {
                            trace!("Queuing preferences snapshot");
                            self.pending = Some(state);
                            if self.debounce.is_zero() {
                                if let Err(e) = self.write_pending().await {
                                    error!("Failed to write preferences: {:#}", e);
                                }
                            } else {
                                self.deadline = Some(Instant::now() + self.debounce);
                            }
                        }
                        Command::Load(reply) => {
                            let _ = reply.send(self.read_state());
                        }
                        Command::Flush(reply) => {
                            let _ = reply.send(self.write_pending().await);
                        }
                        Command::Shutdown => {
                            if let Err(e) = self.write_pending().await {
                                error!("Failed to write preferences on shutdown: {:#}", e);
                            }
                            info!(
                                "Persistence actor stopped (total writes: {})",
                                self.write_count
                            );
                            return;
                        }
                    }
                }
                _ = sleep_until(deadline), if deadline.is_some() => {
                    trace!("Debounce window expired, writing preferences");
                    if let Err(e) = self.write_pending().await {
                        error!("Failed to write preferences: {:#}", e);
                    }
                }
            }
        }
    }

    async fn write_pending(&mut self) -> Result<()> {
        self.deadline = None;
        let Some(state) = self.pending.take() else {
            return Ok(());
        };

        let json = serde_json::to_vec(&state).context("Failed to serialize preferences")?;
        let db = self.db.clone();

        // sled I/O is blocking
        tokio::task::spawn_blocking(move || {
            db.insert(STATE_KEY, json)?;
            db.flush()?;
            Ok::<_, sled::Error>(())
        })
        .await
        .context("Preferences write task panicked")?
        .context("Failed to write preferences to sled")?;

        self.write_count += 1;
        trace!("Preferences written (write #{})", self.write_count);
        Ok(())
    }

    fn read_state(&self) -> Option<PersistedState> {
        match self.db.get(STATE_KEY) {
            Ok(Some(data)) => match serde_json::from_slice::<PersistedState>(&data) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!("Ignoring unreadable preferences: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("Failed to read preferences from sled: {}", e);
                None
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
