//! Seam to the remote relational store. Records travel as JSON objects; each
//! per-entity repo converts them into typed models.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Dogs,
    WeighIns,
    FeedingLogs,
    Milestones,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Dogs => "dogs",
            Collection::WeighIns => "weigh_ins",
            Collection::FeedingLogs => "feeding_logs",
            Collection::Milestones => "milestones",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Collection::Dogs => &[
                "id",
                "user_id",
                "name",
                "breed",
                "date_of_birth",
                "photo_url",
                "initial_weight",
                "target_weight",
                "weight_unit",
                "activity_level",
                "created_at",
                "updated_at",
            ],
            Collection::WeighIns => &["id", "dog_id", "weight", "weighed_on", "notes", "created_at"],
            Collection::FeedingLogs => &[
                "id",
                "dog_id",
                "food_product_id",
                "portion_size",
                "portion_unit",
                "calories",
                "meal_type",
                "fed_at",
                "notes",
                "created_at",
            ],
            Collection::Milestones => &[
                "id",
                "dog_id",
                "milestone_type",
                "weight_at",
                "achieved_at",
                "shared",
                "created_at",
            ],
        }
    }

    /// Returns the column name if it belongs to this collection.
    pub fn column(&self, name: &str) -> Result<&'static str, StoreError> {
        self.columns()
            .iter()
            .copied()
            .find(|c| *c == name)
            .ok_or_else(|| StoreError::UnknownColumn {
                collection: self.table(),
                column: name.to_string(),
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unknown column `{column}` on {collection}")]
    UnknownColumn {
        collection: &'static str,
        column: String,
    },
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("malformed record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: Uuid },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub fn encode<T: Serialize>(record: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(record)?)
}

pub fn decode<T: DeserializeOwned>(row: Value) -> Result<T, StoreError> {
    Ok(serde_json::from_value(row)?)
}

pub fn decode_all<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(decode).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Equality/range filters plus an optional ordering column and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<(String, Direction)>,
    pub limit: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    fn filter(mut self, column: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Inserts one record and returns it as stored.
    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, StoreError>;
    async fn select(&self, collection: Collection, query: &Query) -> Result<Vec<Value>, StoreError>;
    async fn update(&self, collection: Collection, id: Uuid, patch: Value) -> Result<Value, StoreError>;
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError>;
    /// Inserts or updates `rows` as one batch, resolving conflicts on `conflict_columns`.
    async fn upsert(
        &self,
        collection: Collection,
        rows: Vec<Value>,
        conflict_columns: &[&str],
    ) -> Result<Vec<Value>, StoreError>;
    /// Cheap reachability check used by the connectivity probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn column_lookup_rejects_unknown_names() {
        assert_eq!(Collection::WeighIns.column("weighed_on").unwrap(), "weighed_on");
        let err = Collection::WeighIns.column("weight; drop table dogs").unwrap_err();
        assert!(err.to_string().contains("unknown column"));
    }

    #[test]
    fn query_builder_collects_filters_in_order() {
        let q = Query::new()
            .eq("dog_id", "abc")
            .gte("fed_at", "2024-01-01T00:00:00Z")
            .order_by("fed_at", Direction::Asc)
            .limit(5);
        assert_eq!(q.filters.len(), 2);
        assert_eq!(q.filters[0].op, FilterOp::Eq);
        assert_eq!(q.filters[1].value, json!("2024-01-01T00:00:00Z"));
        assert_eq!(q.order, Some(("fed_at".to_string(), Direction::Asc)));
        assert_eq!(q.limit, Some(5));
    }
}
