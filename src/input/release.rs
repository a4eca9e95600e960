//! Debounced release scheduler
//!
//! Some platforms only report key presses. For those keys a synthetic release
//! is scheduled after a short delay, and every new press re-arms the timer.
//!
//! Timers run as tokio tasks and post a [`ReleaseFired`] back into the event
//! loop instead of calling the release handler themselves, so releases are
//! applied in the same sequential order as every other event. Each timer
//! carries an epoch; a fired timer is only honoured if it is still the current
//! one for its key (same idea as the fader setpoint epochs).

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Default delay before a synthetic release
pub const DEFAULT_RELEASE_DELAY: Duration = Duration::from_millis(500);

/// Delay used for keys that never report a release (CapsLock)
pub const SHORT_RELEASE_DELAY: Duration = Duration::from_millis(100);

/// Notification that a release timer expired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFired {
    pub key: String,
    epoch: u64,
}

struct PendingRelease {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// Keyed one-shot release timers with replace-on-rearm semantics
pub struct ReleaseScheduler {
    pending: HashMap<String, PendingRelease>,
    next_epoch: u64,
    fired_tx: mpsc::UnboundedSender<ReleaseFired>,
}

impl ReleaseScheduler {
    /// Create a scheduler and the receiver its timers report to
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ReleaseFired>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        (
            Self {
                pending: HashMap::new(),
                next_epoch: 0,
                fired_tx,
            },
            fired_rx,
        )
    }

    /// Arm (or re-arm) the release timer for `key`
    ///
    /// Any timer already pending for the key is cancelled first and can no
    /// longer release it, even if it expired concurrently.
    pub fn schedule(&mut self, key: &str, delay: Duration) {
        self.next_epoch += 1;
        let epoch = self.next_epoch;

        if let Some(previous) = self.pending.remove(key) {
            previous.handle.abort();
            trace!("Re-arming release timer for {}", key);
        }

        let tx = self.fired_tx.clone();
        let fired = ReleaseFired {
            key: key.to_string(),
            epoch,
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the loop is shutting down
            let _ = tx.send(fired);
        });

        self.pending
            .insert(key.to_string(), PendingRelease { epoch, handle });
    }

    /// Claim a fired timer
    ///
    /// Returns the key to release, or `None` if the timer was superseded or
    /// cancelled after it fired.
    pub fn claim(&mut self, fired: ReleaseFired) -> Option<String> {
        match self.pending.get(&fired.key) {
            Some(current) if current.epoch == fired.epoch => {
                self.pending.remove(&fired.key);
                Some(fired.key)
            }
            _ => {
                trace!("Dropping stale release for {}", fired.key);
                None
            }
        }
    }

    /// Cancel the pending timer for one key
    pub fn cancel(&mut self, key: &str) -> bool {
        match self.pending.remove(key) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for ReleaseScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
