use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{DrainOutcome, OfflineAction};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync/queue", get(list_queue).delete(clear_queue))
        .route("/sync", post(sync_now))
}

#[instrument(skip(state))]
pub async fn list_queue(State(state): State<AppState>) -> Json<Vec<OfflineAction>> {
    Json(state.queue.list().await)
}

#[instrument(skip(state))]
pub async fn clear_queue(State(state): State<AppState>) -> StatusCode {
    state.queue.clear().await;
    StatusCode::NO_CONTENT
}

/// Runs a drain right away; `skipped` if one is already running.
#[instrument(skip(state))]
pub async fn sync_now(State(state): State<AppState>) -> Json<DrainOutcome> {
    Json(state.reconciler.drain().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::{ActionKind, ConnectivityMonitor};
    use crate::remote::memory::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn clear_then_list_is_empty() {
        let state = AppState::fake(Arc::new(MemoryStore::new()), Arc::new(ConnectivityMonitor::new(false)));
        state.queue.enqueue(ActionKind::WeighIn, serde_json::json!({"weight": 70})).await;

        let Json(listed) = list_queue(State(state.clone())).await;
        assert_eq!(listed.len(), 1);

        assert_eq!(clear_queue(State(state.clone())).await, StatusCode::NO_CONTENT);
        let Json(listed) = list_queue(State(state)).await;
        assert!(listed.is_empty());
    }
}
