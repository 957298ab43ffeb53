use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{AssessmentQuery, DogAssessment};
use super::{repo, services};
use crate::error::{reject, ServiceError};
use crate::models::Dog;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dogs/:id", get(get_dog))
        .route("/dogs/:id/assessment", get(get_assessment))
}

#[instrument(skip(state))]
pub async fn get_dog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Dog>, (StatusCode, String)> {
    let dog = repo::get(state.store.as_ref(), id)
        .await
        .map_err(|e| reject(ServiceError::from(e)))?;
    Ok(Json(dog))
}

#[instrument(skip(state))]
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<AssessmentQuery>,
) -> Result<Json<DogAssessment>, (StatusCode, String)> {
    let assessment = services::assess(state.store.as_ref(), id, &q)
        .await
        .map_err(reject)?;
    Ok(Json(assessment))
}
