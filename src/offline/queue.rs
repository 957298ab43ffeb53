use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::remote::Collection;

/// Fixed namespace of the persisted queue; also the file stem on disk.
pub const QUEUE_NAMESPACE: &str = "petfit-offline-queue";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    WeighIn,
    FeedingLog,
}

impl ActionKind {
    /// Collection the action is replayed into.
    pub fn collection(&self) -> Collection {
        match self {
            ActionKind::WeighIn => Collection::WeighIns,
            ActionKind::FeedingLog => Collection::FeedingLogs,
        }
    }
}

/// A mutation recorded while disconnected, waiting to be replayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfflineAction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub payload: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Ordered log of pending actions. Operations are atomic with respect to each other.
#[async_trait]
pub trait ActionQueue: Send + Sync {
    /// Appends an action. Never fails; persistence problems are only logged.
    async fn enqueue(&self, kind: ActionKind, payload: Value) -> OfflineAction;
    /// Removes the action with `id`; unknown ids are ignored.
    async fn dequeue(&self, id: Uuid);
    async fn clear(&self);
    /// Oldest pending action, if any.
    async fn front(&self) -> Option<OfflineAction>;
    /// Snapshot in insertion order.
    async fn list(&self) -> Vec<OfflineAction>;
}

#[derive(Serialize, Deserialize)]
struct PersistedQueue {
    name: String,
    version: u32,
    queue: Vec<OfflineAction>,
}

/// `ActionQueue` kept in memory and, when opened on a directory, mirrored to
/// `<dir>/petfit-offline-queue.json` after every change.
pub struct OfflineQueue {
    actions: Mutex<Vec<OfflineAction>>,
    path: Option<PathBuf>,
}

impl OfflineQueue {
    pub fn in_memory() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            path: None,
        }
    }

    /// Opens (or creates) the durable queue under `dir`.
    ///
    /// A file that cannot be parsed is moved aside with a `.corrupt` suffix and
    /// the queue starts empty.
    pub async fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create queue dir {}", dir.display()))?;
        let path = dir.join(format!("{QUEUE_NAMESPACE}.json"));

        let actions = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<PersistedQueue>(&bytes) {
                Ok(persisted) => persisted.queue,
                Err(e) => {
                    let aside = path.with_extension("json.corrupt");
                    warn!(error = %e, path = %path.display(), "offline queue unreadable; starting empty");
                    if let Err(e) = tokio::fs::rename(&path, &aside).await {
                        warn!(error = %e, "could not move unreadable queue aside");
                    }
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("read offline queue {}", path.display()))
            }
        };

        info!(pending = actions.len(), path = %path.display(), "offline queue loaded");
        Ok(Self {
            actions: Mutex::new(actions),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, actions: &[OfflineAction]) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_atomically(path, actions).await {
            warn!(error = %e, path = %path.display(), "failed to persist offline queue");
        }
    }
}

async fn write_atomically(path: &Path, actions: &[OfflineAction]) -> anyhow::Result<()> {
    let body = serde_json::to_vec(&PersistedQueue {
        name: QUEUE_NAMESPACE.to_string(),
        version: FORMAT_VERSION,
        queue: actions.to_vec(),
    })?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await.context("write temp queue file")?;
    tokio::fs::rename(&tmp, path).await.context("replace queue file")?;
    Ok(())
}

#[async_trait]
impl ActionQueue for OfflineQueue {
    async fn enqueue(&self, kind: ActionKind, payload: Value) -> OfflineAction {
        let action = OfflineAction {
            id: Uuid::new_v4(),
            kind,
            payload,
            created_at: OffsetDateTime::now_utc(),
        };
        let mut actions = self.actions.lock().await;
        actions.push(action.clone());
        self.persist(&actions).await;
        debug!(action_id = %action.id, ?kind, pending = actions.len(), "action queued");
        action
    }

    async fn dequeue(&self, id: Uuid) {
        let mut actions = self.actions.lock().await;
        let before = actions.len();
        actions.retain(|a| a.id != id);
        if actions.len() != before {
            self.persist(&actions).await;
            debug!(action_id = %id, pending = actions.len(), "action dequeued");
        }
    }

    async fn clear(&self) {
        let mut actions = self.actions.lock().await;
        actions.clear();
        self.persist(&actions).await;
        info!("offline queue cleared");
    }

    async fn front(&self) -> Option<OfflineAction> {
        self.actions.lock().await.first().cloned()
    }

    async fn list(&self) -> Vec<OfflineAction> {
        self.actions.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn starts_empty() {
        assert!(OfflineQueue::in_memory().list().await.is_empty());
    }

    #[tokio::test]
    async fn enqueue_assigns_id_and_timestamp() {
        let queue = OfflineQueue::in_memory();
        let before = OffsetDateTime::now_utc();
        let action = queue
            .enqueue(ActionKind::WeighIn, json!({"dog_id": "dog-1", "weight": 70}))
            .await;

        let listed = queue.list().await;
        assert_eq!(listed, vec![action.clone()]);
        assert_eq!(action.kind, ActionKind::WeighIn);
        assert!(!action.id.is_nil());
        assert!(action.created_at >= before);
        assert_eq!(action.payload, json!({"dog_id": "dog-1", "weight": 70}));
    }

    #[tokio::test]
    async fn dequeue_of_returned_id_empties_queue() {
        let queue = OfflineQueue::in_memory();
        let action = queue.enqueue(ActionKind::WeighIn, json!({"weight": 70})).await;
        queue.dequeue(action.id).await;
        assert!(queue.list().await.is_empty());
    }

    #[tokio::test]
    async fn dequeue_removes_only_that_action() {
        let queue = OfflineQueue::in_memory();
        let first = queue.enqueue(ActionKind::WeighIn, json!({"weight": 70})).await;
        queue.enqueue(ActionKind::FeedingLog, json!({"calories": 350})).await;

        queue.dequeue(first.id).await;
        let left = queue.list().await;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].kind, ActionKind::FeedingLog);
    }

    #[tokio::test]
    async fn dequeue_unknown_id_is_a_no_op() {
        let queue = OfflineQueue::in_memory();
        queue.enqueue(ActionKind::WeighIn, json!({"weight": 70})).await;
        queue.dequeue(Uuid::new_v4()).await;
        assert_eq!(queue.list().await.len(), 1);
    }

    #[tokio::test]
    async fn front_follows_dequeue_and_clear() {
        let queue = OfflineQueue::in_memory();
        assert_eq!(queue.front().await, None);
        let first = queue.enqueue(ActionKind::WeighIn, json!({"order": 1})).await;
        let second = queue.enqueue(ActionKind::WeighIn, json!({"order": 2})).await;

        assert_eq!(queue.front().await.map(|a| a.id), Some(first.id));
        queue.dequeue(first.id).await;
        assert_eq!(queue.front().await.map(|a| a.id), Some(second.id));
        queue.clear().await;
        assert_eq!(queue.front().await, None);
    }

    #[tokio::test]
    async fn clear_empties_queue() {
        let queue = OfflineQueue::in_memory();
        queue.enqueue(ActionKind::WeighIn, json!({"weight": 70})).await;
        queue.enqueue(ActionKind::WeighIn, json!({"weight": 69})).await;
        queue.clear().await;
        assert!(queue.list().await.is_empty());
    }

    #[tokio::test]
    async fn preserves_insertion_order() {
        let queue = OfflineQueue::in_memory();
        queue.enqueue(ActionKind::WeighIn, json!({"order": 1})).await;
        queue.enqueue(ActionKind::FeedingLog, json!({"order": 2})).await;
        queue.enqueue(ActionKind::WeighIn, json!({"order": 3})).await;

        let order: Vec<_> = queue
            .list()
            .await
            .into_iter()
            .map(|a| a.payload["order"].as_i64().unwrap())
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let first_id = {
            let queue = OfflineQueue::open(dir.path()).await.expect("open queue");
            let first = queue.enqueue(ActionKind::WeighIn, json!({"order": 1})).await;
            queue.enqueue(ActionKind::FeedingLog, json!({"order": 2})).await;
            first.id
        };

        let reopened = OfflineQueue::open(dir.path()).await.expect("reopen queue");
        let listed = reopened.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first_id);
        assert_eq!(listed[1].kind, ActionKind::FeedingLog);

        reopened.dequeue(first_id).await;
        let again = OfflineQueue::open(dir.path()).await.expect("reopen queue");
        assert_eq!(again.list().await.len(), 1);
    }

    #[tokio::test]
    async fn persisted_file_uses_namespace_and_type_tags() {
        let dir = TempDir::new().expect("temp dir");
        let queue = OfflineQueue::open(dir.path()).await.expect("open queue");
        queue.enqueue(ActionKind::FeedingLog, json!({"calories": 350})).await;

        let path = dir.path().join("petfit-offline-queue.json");
        assert_eq!(queue.path(), Some(path.as_path()));
        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["name"], json!(QUEUE_NAMESPACE));
        assert_eq!(raw["queue"][0]["type"], json!("feeding_log"));
    }

    #[tokio::test]
    async fn unreadable_file_is_moved_aside() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("petfit-offline-queue.json");
        std::fs::write(&path, b"{not json").unwrap();

        let queue = OfflineQueue::open(dir.path()).await.expect("open queue");
        assert!(queue.list().await.is_empty());
        assert!(dir.path().join("petfit-offline-queue.json.corrupt").exists());
    }
}
