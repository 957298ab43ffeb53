//! Offline-first write path: a durable queue of pending mutations, the
//! connectivity signal that decides when to use it, and the reconciler that
//! replays it once the remote store is reachable again.

pub mod connectivity;
pub mod handlers;
pub mod queue;
pub mod sync;

use axum::Router;
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::remote::{decode, encode};
use crate::state::AppState;

pub use connectivity::{spawn_probe, Connectivity, ConnectivityMonitor};
pub use queue::{ActionKind, ActionQueue, OfflineAction, OfflineQueue};
pub use sync::{spawn_sync_worker, DrainOutcome, DrainReport, SyncHandle, SyncReconciler, SyncTrigger};

/// Result of a user write: either stored remotely, or queued with the
/// locally known record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteOutcome<S, L> {
    Sent { record: S },
    Queued { action_id: Uuid, record: L },
}

impl<S, L> WriteOutcome<S, L> {
    pub fn is_queued(&self) -> bool {
        matches!(self, WriteOutcome::Queued { .. })
    }
}

/// Inserts `record` remotely when connected, otherwise enqueues it.
/// A failing remote insert while connected is returned as an error, not queued.
pub async fn write_or_enqueue<S, L>(
    state: &AppState,
    kind: ActionKind,
    record: L,
) -> Result<WriteOutcome<S, L>, ServiceError>
where
    S: DeserializeOwned,
    L: Serialize,
{
    let payload = encode(&record)?;
    if !state.connectivity.is_connected() {
        let action = state.queue.enqueue(kind, payload).await;
        info!(action_id = %action.id, ?kind, "offline; write queued");
        return Ok(WriteOutcome::Queued {
            action_id: action.id,
            record,
        });
    }
    let saved = state.store.insert(kind.collection(), payload).await?;
    Ok(WriteOutcome::Sent {
        record: decode(saved)?,
    })
}

pub fn router() -> Router<AppState> {
    handlers::routes()
}
