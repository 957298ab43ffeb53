use tracing::info;
use uuid::Uuid;

use super::{
    check_goal_milestones, check_streak_milestones, earned_types, repo, DetectedMilestone,
    MilestoneView, StreakCadence,
};
use crate::dogs;
use crate::error::ServiceError;
use crate::models::{Dog, Milestone, WeighIn};
use crate::remote::RemoteStore;
use crate::weigh_ins;

/// Goal milestones at `current_weight` followed by streak milestones over
/// `history`, skipping anything already in `existing`.
pub fn detect_new(
    dog: &Dog,
    current_weight: f64,
    history: &[WeighIn],
    cadence: StreakCadence,
    existing: &[Milestone],
) -> Vec<DetectedMilestone> {
    let earned = earned_types(existing);
    let mut found = check_goal_milestones(dog, current_weight, &earned);
    found.extend(check_streak_milestones(history, cadence, &earned));
    found
}

/// Evaluates and stores milestones after a weigh-in of `current_weight` landed
/// in the store. Returns only the newly earned ones.
pub async fn record_for_weigh_in(
    store: &dyn RemoteStore,
    dog_id: Uuid,
    current_weight: f64,
    cadence: StreakCadence,
) -> Result<Vec<Milestone>, ServiceError> {
    let dog = dogs::repo::get(store, dog_id).await?;
    let history = weigh_ins::repo::history(store, dog_id).await?;
    let existing = repo::list_for_dog(store, dog_id).await?;

    let found = detect_new(&dog, current_weight, &history, cadence, &existing);
    if found.is_empty() {
        return Ok(Vec::new());
    }
    let saved = repo::save(store, dog_id, &found).await?;
    info!(%dog_id, earned = saved.len(), "milestones recorded");
    Ok(saved)
}

pub async fn list(store: &dyn RemoteStore, dog_id: Uuid) -> Result<Vec<MilestoneView>, ServiceError> {
    let milestones = repo::list_for_dog(store, dog_id).await?;
    Ok(milestones.into_iter().map(MilestoneView::from).collect())
}
