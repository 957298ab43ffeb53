use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{services, MilestoneView};
use crate::error::reject;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/dogs/:id/milestones", get(list_milestones))
}

#[instrument(skip(state))]
pub async fn list_milestones(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MilestoneView>>, (StatusCode, String)> {
    let views = services::list(state.store.as_ref(), id).await.map_err(reject)?;
    Ok(Json(views))
}
