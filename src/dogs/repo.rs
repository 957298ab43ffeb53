use uuid::Uuid;

use crate::models::Dog;
use crate::remote::{decode, Collection, Query, RemoteStore, StoreError};

pub async fn get(store: &dyn RemoteStore, id: Uuid) -> Result<Dog, StoreError> {
    let rows = store
        .select(Collection::Dogs, &Query::new().eq("id", id.to_string()).limit(1))
        .await?;
    let row = rows.into_iter().next().ok_or(StoreError::NotFound {
        collection: Collection::Dogs.table(),
        id,
    })?;
    decode(row)
}
