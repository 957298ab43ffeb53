use uuid::Uuid;

use crate::models::WeighIn;
use crate::remote::{decode_all, Collection, Direction, Query, RemoteStore, StoreError};

/// All weigh-ins of a dog, oldest first.
pub async fn history(store: &dyn RemoteStore, dog_id: Uuid) -> Result<Vec<WeighIn>, StoreError> {
    let rows = store
        .select(
            Collection::WeighIns,
            &Query::new()
                .eq("dog_id", dog_id.to_string())
                .order_by("weighed_on", Direction::Asc),
        )
        .await?;
    decode_all(rows)
}

pub async fn latest(store: &dyn RemoteStore, dog_id: Uuid) -> Result<Option<WeighIn>, StoreError> {
    let rows = store
        .select(
            Collection::WeighIns,
            &Query::new()
                .eq("dog_id", dog_id.to_string())
                .order_by("weighed_on", Direction::Desc)
                .limit(1),
        )
        .await?;
    Ok(decode_all(rows)?.into_iter().next())
}
