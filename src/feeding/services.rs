use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use super::dto::{CreateFeedingLogRequest, DailySummary};
use super::repo;
use crate::error::ServiceError;
use crate::models::{FeedingLog, NewFeedingLog};
use crate::offline::{write_or_enqueue, ActionKind, WriteOutcome};
use crate::remote::RemoteStore;
use crate::state::AppState;

pub async fn record(
    state: &AppState,
    req: CreateFeedingLogRequest,
) -> Result<WriteOutcome<FeedingLog, NewFeedingLog>, ServiceError> {
    let new = req.into_new(OffsetDateTime::now_utc())?;
    write_or_enqueue(state, ActionKind::FeedingLog, new).await
}

pub async fn daily_summary(store: &dyn RemoteStore, dog_id: Uuid, day: Date) -> Result<DailySummary, ServiceError> {
    let logs = repo::for_day(store, dog_id, day).await?;
    let date = day
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
    Ok(DailySummary {
        dog_id,
        date,
        total_calories: logs.iter().map(|l| l.calories).sum(),
        logs,
    })
}

pub async fn delete(store: &dyn RemoteStore, id: Uuid) -> Result<(), ServiceError> {
    repo::delete(store, id).await?;
    info!(feeding_log_id = %id, "feeding log deleted");
    Ok(())
}
