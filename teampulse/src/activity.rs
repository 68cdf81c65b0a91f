//! Activity intake: turns raw interaction signals into activity pings.
//!
//! A host registers an [`ActivityListener`] for the current user and feeds
//! it [`ActivitySignal`]s through cloneable [`ActivitySender`]s. The
//! listener is a scoped registration: the background task stops on
//! [`ActivityListener::shutdown`] or, on any other exit path, when the
//! listener is dropped.

use teampulse_model::member::MemberId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::store::{EngineError, PingOutcome, SharedStore};

/// Kind of raw user interaction that counts as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivitySignal {
    /// Mouse press or movement.
    Pointer,
    /// Key press.
    Keyboard,
    /// Touch start.
    Touch,
    /// Scrolling.
    Scroll,
}

impl std::fmt::Display for ActivitySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pointer => write!(f, "pointer"),
            Self::Keyboard => write!(f, "keyboard"),
            Self::Touch => write!(f, "touch"),
            Self::Scroll => write!(f, "scroll"),
        }
    }
}

/// Fire-and-forget handle for delivering signals to a listener.
#[derive(Debug, Clone)]
pub struct ActivitySender {
    tx: mpsc::Sender<ActivitySignal>,
}

impl ActivitySender {
    /// Delivers a signal without waiting.
    ///
    /// Returns `false` if the signal was dropped because the queue is full
    /// or the listener is gone. Pings are idempotent, so a dropped signal
    /// is never an error.
    pub fn signal(&self, signal: ActivitySignal) -> bool {
        match self.tx.try_send(signal) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::trace!(%signal, "activity queue full, signal dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Returns `true` once the listener has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A registered activity listener for one member.
#[derive(Debug)]
pub struct ActivityListener {
    member_id: MemberId,
    sender: ActivitySender,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ActivityListener {
    /// Registers a listener that pings `member_id` for every signal.
    ///
    /// Must be called from within a Tokio runtime. `capacity` bounds the
    /// number of queued signals (minimum 1).
    #[must_use]
    pub fn register(store: SharedStore, member_id: MemberId, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let target = member_id.clone();

        let task = tokio::spawn(async move {
            tracing::debug!(member = %target, "activity listener registered");
            loop {
                tokio::select! {
                    biased;
                    signal = rx.recv() => {
                        let Some(signal) = signal else { break };
                        match store.ping_activity(&target) {
                            Ok(PingOutcome::Recorded) => {
                                tracing::trace!(member = %target, %signal, "activity recorded");
                            }
                            Ok(PingOutcome::IgnoredOffline) => {
                                tracing::trace!(member = %target, %signal, "member offline, ping ignored");
                            }
                            Err(EngineError::MemberNotFound(id)) => {
                                tracing::warn!(member = %id, "activity for unknown member");
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "unexpected activity ping failure");
                            }
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
            tracing::debug!(member = %target, "activity listener stopped");
        });

        Self {
            member_id,
            sender: ActivitySender { tx },
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// The member this listener pings.
    #[must_use]
    pub const fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    /// Returns a new sender for this listener.
    #[must_use]
    pub fn sender(&self) -> ActivitySender {
        self.sender.clone()
    }

    /// Stops the listener after draining already-queued signals.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ActivityListener {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
