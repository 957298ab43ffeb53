use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::models::FeedingLog;
use crate::remote::{decode_all, Collection, Direction, Query, RemoteStore, StoreError};

fn rfc3339(at: OffsetDateTime) -> Result<String, StoreError> {
    at.format(&Rfc3339)
        .map_err(|e| StoreError::InvalidRecord(e.to_string()))
}

/// Logs with `fed_at` inside the UTC calendar day, in feeding order.
pub async fn for_day(store: &dyn RemoteStore, dog_id: Uuid, day: Date) -> Result<Vec<FeedingLog>, StoreError> {
    let start = day.midnight().assume_utc();
    // timestamptz keeps microseconds
    let end = day
        .with_hms_micro(23, 59, 59, 999_999)
        .map_err(|e| StoreError::InvalidRecord(e.to_string()))?
        .assume_utc();

    let rows = store
        .select(
            Collection::FeedingLogs,
            &Query::new()
                .eq("dog_id", dog_id.to_string())
                .gte("fed_at", rfc3339(start)?)
                .lte("fed_at", rfc3339(end)?)
                .order_by("fed_at", Direction::Asc),
        )
        .await?;
    decode_all(rows)
}

pub async fn delete(store: &dyn RemoteStore, id: Uuid) -> Result<(), StoreError> {
    store.delete(Collection::FeedingLogs, id).await
}
