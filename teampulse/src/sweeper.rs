//! Periodic inactivity sweep.
//!
//! [`Sweeper::spawn`] starts a background task that calls
//! [`SharedStore::sweep_inactive`] once per cadence. The first sweep runs
//! one full cadence after spawning. The task stops on
//! [`Sweeper::shutdown`] or when the `Sweeper` is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::store::SharedStore;

/// Timing parameters for the inactivity sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// How long a member may stay idle before being marked offline.
    pub threshold: Duration,
    /// How often the sweep runs.
    pub cadence: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            threshold: Duration::from_secs(10 * 60),
            cadence: Duration::from_secs(60),
        }
    }
}

/// Handle to a running sweep task.
#[derive(Debug)]
pub struct Sweeper {
    swept: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawns the sweep loop. Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(store: SharedStore, config: SweepConfig) -> Self {
        let swept = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&swept);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let cadence = config.cadence.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut tick = tokio::time::interval_at(Instant::now() + cadence, cadence);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(
                threshold_secs = config.threshold.as_secs(),
                cadence_secs = cadence.as_secs(),
                "inactivity sweeper started"
            );
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = tick.tick() => {
                        let transitioned = store.sweep_inactive(config.threshold);
                        counter.fetch_add(transitioned, Ordering::Relaxed);
                        if transitioned > 0 {
                            tracing::info!(transitioned, "inactivity sweep marked members offline");
                        } else {
                            tracing::trace!("inactivity sweep found no idle members");
                        }
                    }
                }
            }
            tracing::debug!("inactivity sweeper stopped");
        });

        Self {
            swept,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Total members transitioned to offline since the sweeper started.
    #[must_use]
    pub fn swept(&self) -> usize {
        self.swept.load(Ordering::Relaxed)
    }

    /// Stops the sweep loop and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
