//! In-memory `RemoteStore` for tests, with switches for failure injection.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use super::{Collection, Direction, FilterOp, Query, RemoteStore, StoreError};

type Rejection = Arc<dyn Fn(Collection, &Value) -> bool + Send + Sync>;

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<Collection, Vec<Value>>>,
    reject: Mutex<Option<Rejection>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes matching `predicate` fail with `StoreError::Unavailable`.
    pub fn reject_writes_where<F>(&self, predicate: F)
    where
        F: Fn(Collection, &Value) -> bool + Send + Sync + 'static,
    {
        *self.reject.lock().unwrap() = Some(Arc::new(predicate));
    }

    pub fn accept_all_writes(&self) {
        *self.reject.lock().unwrap() = None;
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.offline.store(!reachable, AtomicOrdering::SeqCst);
    }

    /// Stores `record` as-is, bypassing defaults and rejection.
    pub fn seed(&self, collection: Collection, record: Value) {
        self.rows
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(record);
    }

    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        self.rows
            .lock()
            .unwrap()
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    fn check_write(&self, collection: Collection, record: &Value) -> Result<(), StoreError> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("store unreachable".into()));
        }
        if let Some(reject) = self.reject.lock().unwrap().as_ref() {
            if reject(collection, record) {
                return Err(StoreError::Unavailable("write rejected".into()));
            }
        }
        Ok(())
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

fn validated(collection: Collection, record: &Value) -> Result<Map<String, Value>, StoreError> {
    let obj = record
        .as_object()
        .ok_or_else(|| StoreError::InvalidRecord("expected a JSON object".into()))?;
    for key in obj.keys() {
        collection.column(key)?;
    }
    Ok(obj.clone())
}

fn with_defaults(collection: Collection, mut obj: Map<String, Value>) -> Value {
    obj.entry("id").or_insert_with(|| json!(Uuid::new_v4()));
    obj.entry("created_at").or_insert_with(|| json!(now_rfc3339()));
    if collection == Collection::Milestones {
        obj.entry("achieved_at").or_insert_with(|| json!(now_rfc3339()));
        obj.entry("shared").or_insert(json!(false));
    }
    Value::Object(obj)
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn id_matches(row: &Value, id: Uuid) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id.to_string().as_str())
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, StoreError> {
        let obj = validated(collection, &record)?;
        self.check_write(collection, &record)?;
        let row = with_defaults(collection, obj);
        self.seed(collection, row.clone());
        Ok(row)
    }

    async fn select(&self, collection: Collection, query: &Query) -> Result<Vec<Value>, StoreError> {
        for filter in &query.filters {
            collection.column(&filter.column)?;
        }
        let mut rows: Vec<Value> = self
            .rows(collection)
            .into_iter()
            .filter(|row| {
                query.filters.iter().all(|f| {
                    let ord = compare(row.get(&f.column).unwrap_or(&Value::Null), &f.value);
                    match f.op {
                        FilterOp::Eq => ord == Some(Ordering::Equal),
                        FilterOp::Gte => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
                        FilterOp::Lte => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
                    }
                })
            })
            .collect();

        if let Some((column, direction)) = &query.order {
            collection.column(column)?;
            rows.sort_by(|a, b| {
                let ord = compare(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                )
                .unwrap_or(Ordering::Equal);
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows)
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Value) -> Result<Value, StoreError> {
        let patch = validated(collection, &patch)?;
        self.check_write(collection, &Value::Object(patch.clone()))?;
        let mut all = self.rows.lock().unwrap();
        let row = all
            .entry(collection)
            .or_default()
            .iter_mut()
            .find(|row| id_matches(row, id))
            .ok_or(StoreError::NotFound {
                collection: collection.table(),
                id,
            })?;
        if let Value::Object(obj) = row {
            obj.extend(patch);
        }
        Ok(row.clone())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError> {
        self.check_write(collection, &json!({ "id": id }))?;
        let mut all = self.rows.lock().unwrap();
        let rows = all.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|row| !id_matches(row, id));
        if rows.len() == before {
            return Err(StoreError::NotFound {
                collection: collection.table(),
                id,
            });
        }
        Ok(())
    }

    async fn upsert(
        &self,
        collection: Collection,
        rows: Vec<Value>,
        conflict_columns: &[&str],
    ) -> Result<Vec<Value>, StoreError> {
        let mut incoming = Vec::with_capacity(rows.len());
        for row in &rows {
            incoming.push(validated(collection, row)?);
            self.check_write(collection, row)?;
        }

        let mut all = self.rows.lock().unwrap();
        let stored = all.entry(collection).or_default();
        let mut saved = Vec::with_capacity(incoming.len());
        for obj in incoming {
            let existing = stored.iter().position(|row| {
                conflict_columns
                    .iter()
                    .all(|c| row.get(*c) == obj.get(*c))
            });
            match existing {
                Some(i) => {
                    if let Value::Object(current) = &mut stored[i] {
                        current.extend(obj);
                    }
                    saved.push(stored[i].clone());
                }
                None => {
                    let row = with_defaults(collection, obj);
                    stored.push(row.clone());
                    saved.push(row);
                }
            }
        }
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("store unreachable".into()));
        }
        Ok(())
    }
}
