//! Achievement milestones: goal-progress thresholds and weigh-in streaks,
//! each earned at most once per dog.

mod detect;
mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

pub use detect::{
    check_goal_milestones, check_streak_milestones, earned_types, trailing_streak,
    DetectedMilestone, MilestoneType, StreakCadence,
};
pub use dto::MilestoneView;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
