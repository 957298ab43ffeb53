use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateWeighInRequest, WeighInReceipt};
use super::services;
use crate::error::reject;
use crate::models::WeighIn;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/weigh_ins", post(create_weigh_in))
        .route("/dogs/:id/weigh_ins", get(list_weigh_ins))
}

/// 201 when stored, 202 when queued for later replay.
#[instrument(skip(state))]
pub async fn create_weigh_in(
    State(state): State<AppState>,
    Json(body): Json<CreateWeighInRequest>,
) -> Result<(StatusCode, Json<WeighInReceipt>), (StatusCode, String)> {
    let receipt = services::record(&state, body).await.map_err(reject)?;
    let status = if receipt.outcome.is_queued() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(receipt)))
}

#[instrument(skip(state))]
pub async fn list_weigh_ins(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<WeighIn>>, (StatusCode, String)> {
    let history = services::history(state.store.as_ref(), id).await.map_err(reject)?;
    Ok(Json(history))
}
