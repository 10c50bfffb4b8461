//! Background eviction of expired cache entries
//!
//! The reaper runs on its own tokio task and sweeps the store on a fixed tick
//! that is independent of the TTL. It holds only a weak reference to the store,
//! so it also winds down once the store is gone.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::store::{CacheStore, WeakStore};

/// Default interval between eviction sweeps
pub const DEFAULT_REAP_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest tick the reaper accepts; zero would make `interval` panic
pub const MIN_REAP_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns the background eviction task
pub struct Reaper;

/// Handle for stopping a running reaper
#[derive(Debug)]
pub struct ReaperHandle {
    /// Signals the task to stop
    shutdown_tx: mpsc::Sender<()>,
    /// The spawned sweep loop
    task: JoinHandle<()>,
}

impl Reaper {
    /// Starts sweeping `store` every `tick`
    ///
    /// Must be called from within a tokio runtime. The task stops when
    /// `ReaperHandle::shutdown` is called, when the handle is dropped, or
    /// when every owner of the store has been dropped. A tick below
    /// `MIN_REAP_INTERVAL` is raised to it.
    pub fn spawn(store: &CacheStore, tick: Duration) -> ReaperHandle {
        let tick = tick.max(MIN_REAP_INTERVAL);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let task = tokio::spawn(reap_loop(store.downgrade(), tick, shutdown_rx));

        ReaperHandle { shutdown_tx, task }
    }
}

async fn reap_loop(store: WeakStore, tick: Duration, mut shutdown_rx: mpsc::Receiver<()>) {
    let mut interval = tokio::time::interval(tick);
    // Skip the first tick (immediate)
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let Some(store) = store.upgrade() else {
                    debug!("cache store dropped, stopping reaper");
                    break;
                };
                let evicted = store.reap();
                if evicted > 0 {
                    debug!(evicted, remaining = store.len(), "reaped expired cache entries");
                }
            }
            _ = shutdown_rx.recv() => {
                debug!("reaper shutting down");
                break;
            }
        }
    }
}

impl ReaperHandle {
    /// Stops the reaper and waits for the task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "reaper task ended abnormally");
        }
    }

    /// Returns `true` once the sweep loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
