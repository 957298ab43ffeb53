use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::queue::{ActionKind, ActionQueue, OfflineAction};
use crate::milestones::{self, StreakCadence};
use crate::remote::{RemoteStore, StoreError};

/// What asked for a drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    ConnectivityRestored,
    Manual,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DrainReport {
    pub replayed: usize,
    pub remaining: usize,
    /// Action that failed and stopped the pass, if any.
    pub halted_on: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrainOutcome {
    /// Another drain was already running.
    Skipped,
    Completed(DrainReport),
}

/// Replays queued actions against the remote store in FIFO order, always
/// taking the current head of the queue.
///
/// Only one drain runs at a time; concurrent requests return
/// [`DrainOutcome::Skipped`]. A failed action halts the pass and stays queued
/// together with everything behind it.
pub struct SyncReconciler {
    queue: Arc<dyn ActionQueue>,
    store: Arc<dyn RemoteStore>,
    cadence: StreakCadence,
    gate: Mutex<()>,
}

impl SyncReconciler {
    pub fn new(queue: Arc<dyn ActionQueue>, store: Arc<dyn RemoteStore>, cadence: StreakCadence) -> Self {
        Self {
            queue,
            store,
            cadence,
            gate: Mutex::new(()),
        }
    }

    pub async fn drain(&self) -> DrainOutcome {
        let Ok(_running) = self.gate.try_lock() else {
            debug!("drain already in progress; skipping");
            return DrainOutcome::Skipped;
        };

        let pending = self.queue.list().await.len();
        if pending == 0 {
            return DrainOutcome::Completed(DrainReport {
                replayed: 0,
                remaining: 0,
                halted_on: None,
            });
        }
        info!(pending, "draining offline queue");

        // Re-read the head each round so a clear() mid-pass stops the replay.
        let mut replayed = 0;
        let mut halted_on = None;
        while let Some(action) = self.queue.front().await {
            match self.replay(&action).await {
                Ok(()) => {
                    self.queue.dequeue(action.id).await;
                    replayed += 1;
                    self.after_replay(&action).await;
                }
                Err(e) => {
                    warn!(action_id = %action.id, kind = ?action.kind, error = %e, "replay failed; halting drain");
                    halted_on = Some(action.id);
                    break;
                }
            }
        }

        let remaining = self.queue.list().await.len();
        info!(replayed, remaining, "drain finished");
        DrainOutcome::Completed(DrainReport {
            replayed,
            remaining,
            halted_on,
        })
    }

    async fn replay(&self, action: &OfflineAction) -> Result<(), StoreError> {
        self.store
            .insert(action.kind.collection(), action.payload.clone())
            .await
            .map(|_| ())
    }

    /// Milestones for weigh-ins recorded offline are evaluated once they land.
    async fn after_replay(&self, action: &OfflineAction) {
        if action.kind != ActionKind::WeighIn {
            return;
        }
        let dog_id = action
            .payload
            .get("dog_id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok());
        let weight = action.payload.get("weight").and_then(Value::as_f64);
        let (Some(dog_id), Some(weight)) = (dog_id, weight) else {
            warn!(action_id = %action.id, "replayed weigh-in lacks dog_id or weight");
            return;
        };

        match milestones::services::record_for_weigh_in(self.store.as_ref(), dog_id, weight, self.cadence).await {
            Ok(earned) if !earned.is_empty() => {
                info!(action_id = %action.id, %dog_id, earned = earned.len(), "milestones earned on replay");
            }
            Ok(_) => {}
            Err(e) => {
                warn!(action_id = %action.id, %dog_id, error = %e, "milestone evaluation after replay failed");
            }
        }
    }
}

/// Sends manual drain requests to the background sync worker.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::Sender<SyncTrigger>,
}

impl SyncHandle {
    /// Returns false if a request is already waiting or the worker is gone.
    pub fn trigger(&self) -> bool {
        self.tx.try_send(SyncTrigger::Manual).is_ok()
    }
}

/// Starts the drain worker plus a watcher that requests a drain on every
/// offline-to-online transition.
pub fn spawn_sync_worker(
    reconciler: Arc<SyncReconciler>,
    mut connectivity: watch::Receiver<bool>,
) -> SyncHandle {
    let (tx, mut rx) = mpsc::channel::<SyncTrigger>(4);

    tokio::spawn(async move {
        while let Some(trigger) = rx.recv().await {
            debug!(?trigger, "sync requested");
            if let DrainOutcome::Completed(report) = reconciler.drain().await {
                if let Some(action_id) = report.halted_on {
                    debug!(%action_id, remaining = report.remaining, "queue left pending");
                }
            }
        }
    });

    let restored = tx.clone();
    let mut was_connected = *connectivity.borrow_and_update();
    tokio::spawn(async move {
        while connectivity.changed().await.is_ok() {
            let connected = *connectivity.borrow_and_update();
            let came_back = connected && !was_connected;
            was_connected = connected;
            if came_back && restored.send(SyncTrigger::ConnectivityRestored).await.is_err() {
                break;
            }
        }
    });

    SyncHandle { tx }
}
