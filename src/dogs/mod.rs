mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

pub use dto::{AssessmentQuery, DogAssessment};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
