use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::{Collection, Direction, FilterOp, Query, RemoteStore, StoreError};

/// Postgres-backed store. Column names are checked against the collection
/// allow-list before they reach SQL; values are always bound as JSONB and
/// expanded server-side with `jsonb_populate_record`.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

fn record_object(record: &Value) -> Result<&Map<String, Value>, StoreError> {
    let obj = record
        .as_object()
        .ok_or_else(|| StoreError::InvalidRecord("expected a JSON object".into()))?;
    if obj.is_empty() {
        return Err(StoreError::InvalidRecord("record has no columns".into()));
    }
    Ok(obj)
}

fn record_columns(collection: Collection, record: &Value) -> Result<Vec<&'static str>, StoreError> {
    record_object(record)?
        .keys()
        .map(|k| collection.column(k))
        .collect()
}

fn projected(columns: &[&str]) -> (String, String) {
    let names = columns.join(", ");
    let from_r = columns
        .iter()
        .map(|c| format!("r.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    (names, from_r)
}

pub(crate) fn insert_sql(collection: Collection, record: &Value) -> Result<String, StoreError> {
    let table = collection.table();
    let (names, from_r) = projected(&record_columns(collection, record)?);
    Ok(format!(
        "INSERT INTO {table} AS t ({names}) \
         SELECT {from_r} FROM jsonb_populate_record(NULL::{table}, $1) AS r \
         RETURNING to_jsonb(t.*)"
    ))
}

/// Returns the SQL plus one JSONB argument per filter.
pub(crate) fn select_sql(collection: Collection, query: &Query) -> Result<(String, Vec<Value>), StoreError> {
    let table = collection.table();
    let mut sql = format!("SELECT to_jsonb(t.*) FROM {table} AS t");
    let mut args = Vec::with_capacity(query.filters.len());

    for (i, filter) in query.filters.iter().enumerate() {
        let column = collection.column(&filter.column)?;
        let op = match filter.op {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        };
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        sql.push_str(&format!(
            "t.{column} {op} (jsonb_populate_record(NULL::{table}, ${})).{column}",
            i + 1
        ));
        let mut arg = Map::new();
        arg.insert(column.to_string(), filter.value.clone());
        args.push(Value::Object(arg));
    }

    if let Some((column, direction)) = &query.order {
        let column = collection.column(column)?;
        let direction = match direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY t.{column} {direction}"));
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit.max(0)));
    }
    Ok((sql, args))
}

pub(crate) fn update_sql(collection: Collection, patch: &Value) -> Result<String, StoreError> {
    let table = collection.table();
    let assignments = record_columns(collection, patch)?
        .iter()
        .map(|c| format!("{c} = r.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "UPDATE {table} AS t SET {assignments} \
         FROM jsonb_populate_record(NULL::{table}, $1) AS r \
         WHERE t.id = $2 RETURNING to_jsonb(t.*)"
    ))
}

pub(crate) fn upsert_sql(
    collection: Collection,
    rows: &[Value],
    conflict_columns: &[&str],
) -> Result<String, StoreError> {
    let table = collection.table();
    let first = rows
        .first()
        .ok_or_else(|| StoreError::InvalidRecord("upsert needs at least one row".into()))?;
    let columns = record_columns(collection, first)?;
    for row in &rows[1..] {
        let mut other = record_columns(collection, row)?;
        let mut expected = columns.clone();
        other.sort_unstable();
        expected.sort_unstable();
        if other != expected {
            return Err(StoreError::InvalidRecord(
                "upsert rows must share the same columns".into(),
            ));
        }
    }

    let conflict = conflict_columns
        .iter()
        .map(|c| collection.column(c))
        .collect::<Result<Vec<_>, _>>()?;
    let updates = columns
        .iter()
        .filter(|c| !conflict.contains(c))
        .map(|c| format!("{c} = EXCLUDED.{c}"))
        .collect::<Vec<_>>();
    let on_conflict = if updates.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };

    let (names, from_r) = projected(&columns);
    Ok(format!(
        "INSERT INTO {table} AS t ({names}) \
         SELECT {from_r} FROM jsonb_populate_recordset(NULL::{table}, $1) AS r \
         ON CONFLICT ({}) {on_conflict} \
         RETURNING to_jsonb(t.*)",
        conflict.join(", ")
    ))
}

#[async_trait]
impl RemoteStore for PgStore {
    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, StoreError> {
        let sql = insert_sql(collection, &record)?;
        debug!(table = collection.table(), "insert");
        let row = sqlx::query_scalar::<_, Value>(&sql)
            .bind(Json(record))
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn select(&self, collection: Collection, query: &Query) -> Result<Vec<Value>, StoreError> {
        let (sql, args) = select_sql(collection, query)?;
        debug!(table = collection.table(), filters = args.len(), "select");
        let mut q = sqlx::query_scalar::<_, Value>(&sql);
        for arg in args {
            q = q.bind(Json(arg));
        }
        Ok(q.fetch_all(&self.db).await?)
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Value) -> Result<Value, StoreError> {
        let sql = update_sql(collection, &patch)?;
        debug!(table = collection.table(), %id, "update");
        sqlx::query_scalar::<_, Value>(&sql)
            .bind(Json(patch))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::NotFound {
                collection: collection.table(),
                id,
            })
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError> {
        let table = collection.table();
        debug!(table, %id, "delete");
        let done = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.db)
            .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound { collection: table, id });
        }
        Ok(())
    }

    async fn upsert(
        &self,
        collection: Collection,
        rows: Vec<Value>,
        conflict_columns: &[&str],
    ) -> Result<Vec<Value>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let sql = upsert_sql(collection, &rows, conflict_columns)?;
        debug!(table = collection.table(), rows = rows.len(), "upsert");
        let saved = sqlx::query_scalar::<_, Value>(&sql)
            .bind(Json(Value::Array(rows)))
            .fetch_all(&self.db)
            .await?;
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
