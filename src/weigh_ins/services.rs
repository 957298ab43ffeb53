use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use super::dto::{CreateWeighInRequest, WeighInReceipt};
use super::repo;
use crate::error::ServiceError;
use crate::milestones::{self, MilestoneView};
use crate::models::{NewWeighIn, WeighIn};
use crate::offline::{write_or_enqueue, ActionKind, WriteOutcome};
use crate::remote::RemoteStore;
use crate::state::AppState;

/// Stores a weigh-in (or queues it offline) and evaluates milestones for
/// weigh-ins that reached the store.
pub async fn record(state: &AppState, req: CreateWeighInRequest) -> Result<WeighInReceipt, ServiceError> {
    let new = req.into_new(OffsetDateTime::now_utc().date())?;
    let outcome: WriteOutcome<WeighIn, NewWeighIn> =
        write_or_enqueue(state, ActionKind::WeighIn, new).await?;

    let stored = match &outcome {
        WriteOutcome::Sent { record } => Some((record.id, record.dog_id, record.weight)),
        WriteOutcome::Queued { .. } => None,
    };
    let Some((weigh_in_id, dog_id, weight)) = stored else {
        return Ok(WeighInReceipt {
            outcome,
            milestones: Vec::new(),
            milestone_error: None,
        });
    };

    let evaluated = milestones::services::record_for_weigh_in(
        state.store.as_ref(),
        dog_id,
        weight,
        state.config.streak_cadence,
    )
    .await;
    let (earned, milestone_error) = match evaluated {
        Ok(earned) => (earned.into_iter().map(MilestoneView::from).collect(), None),
        Err(e) => {
            warn!(%weigh_in_id, error = %e, "milestone evaluation failed");
            (Vec::new(), Some(e.to_string()))
        }
    };
    Ok(WeighInReceipt {
        outcome,
        milestones: earned,
        milestone_error,
    })
}

pub async fn history(store: &dyn RemoteStore, dog_id: Uuid) -> Result<Vec<WeighIn>, ServiceError> {
    Ok(repo::history(store, dog_id).await?)
}
