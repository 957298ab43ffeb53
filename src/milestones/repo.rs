use uuid::Uuid;

use super::DetectedMilestone;
use crate::models::{Milestone, NewMilestone};
use crate::remote::{decode_all, encode, Collection, Direction, Query, RemoteStore, StoreError};

/// Each milestone type is earned once per dog.
pub const CONFLICT_COLUMNS: [&str; 2] = ["dog_id", "milestone_type"];

/// Most recent first.
pub async fn list_for_dog(store: &dyn RemoteStore, dog_id: Uuid) -> Result<Vec<Milestone>, StoreError> {
    let rows = store
        .select(
            Collection::Milestones,
            &Query::new()
                .eq("dog_id", dog_id.to_string())
                .order_by("achieved_at", Direction::Desc),
        )
        .await?;
    decode_all(rows)
}

/// Persists all detected milestones in one upsert.
pub async fn save(
    store: &dyn RemoteStore,
    dog_id: Uuid,
    detected: &[DetectedMilestone],
) -> Result<Vec<Milestone>, StoreError> {
    if detected.is_empty() {
        return Ok(Vec::new());
    }
    let rows = detected
        .iter()
        .map(|m| {
            encode(&NewMilestone {
                dog_id,
                milestone_type: m.milestone_type,
                weight_at: Some(m.weight_at),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let saved = store.upsert(Collection::Milestones, rows, &CONFLICT_COLUMNS).await?;
    decode_all(saved)
}
