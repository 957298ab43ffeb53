use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateFeedingLogRequest, DailyQuery, DailySummary};
use super::services;
use crate::error::reject;
use crate::models::{FeedingLog, NewFeedingLog};
use crate::offline::WriteOutcome;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feeding_logs", post(create_feeding_log))
        .route("/feeding_logs/:id", delete(delete_feeding_log))
        .route("/dogs/:id/feeding_logs", get(daily_feeding_logs))
}

/// 201 when stored, 202 when queued for later replay.
#[instrument(skip(state))]
pub async fn create_feeding_log(
    State(state): State<AppState>,
    Json(body): Json<CreateFeedingLogRequest>,
) -> Result<(StatusCode, Json<WriteOutcome<FeedingLog, NewFeedingLog>>), (StatusCode, String)> {
    let outcome = services::record(&state, body).await.map_err(reject)?;
    let status = if outcome.is_queued() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(outcome)))
}

#[instrument(skip(state))]
pub async fn daily_feeding_logs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<DailyQuery>,
) -> Result<Json<DailySummary>, (StatusCode, String)> {
    let day = q.day(OffsetDateTime::now_utc().date()).map_err(reject)?;
    let summary = services::daily_summary(state.store.as_ref(), id, day)
        .await
        .map_err(reject)?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn delete_feeding_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    services::delete(state.store.as_ref(), id).await.map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}
