use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;

use crate::core::{
    models::{
        common::ListQuery,
        schema::{record_id, Assignment, Field, FieldKind, FieldValue, Record, ResourceSchema},
        user::{self, Credentials},
    },
    ports::repository::{Common, Manager, ResourceCommon, Store, TxStore, UserCommon},
};
use crate::error::Error;

#[derive(Clone, Default)]
struct Tables {
    rows: HashMap<&'static str, Vec<Record>>,
    next_id: i64,
}

/// In-process store used by the unit and handler tests. Rows keep every
/// column, reads project the readable ones the way the SQL adapter does.
#[derive(Clone, Default)]
pub struct MemoryManager {
    tables: Arc<Mutex<Tables>>,
}

pub struct MemoryStore {
    shared: Arc<Mutex<Tables>>,
    staged: Option<Tables>,
}

impl MemoryStore {
    fn with<R>(&mut self, f: impl FnOnce(&mut Tables) -> R) -> R {
        match &mut self.staged {
            Some(tables) => f(tables),
            None => {
                let mut guard = self.shared.lock().unwrap();
                f(&mut *guard)
            }
        }
    }
}

fn now() -> Value {
    Value::from(Utc::now().to_rfc3339())
}

fn project(schema: &ResourceSchema, row: &Record) -> Record {
    let mut record = Record::new();
    record.insert("id".into(), row.get("id").cloned().unwrap_or(Value::Null));
    for field in schema.readable_fields() {
        record.insert(field.name.into(), row.get(field.name).cloned().unwrap_or(Value::Null));
    }
    record.insert("createdAt".into(), row.get("createdAt").cloned().unwrap_or(Value::Null));
    record.insert("updatedAt".into(), row.get("updatedAt").cloned().unwrap_or(Value::Null));
    record
}

fn matches(schema: &ResourceSchema, row: &Record, query: &ListQuery) -> bool {
    if let (Some(status), Some(field)) = (&query.status, schema.status()) {
        if row.get(field.name).and_then(Value::as_str) != Some(status.as_str()) {
            return false;
        }
    }
    for (field, value) in &query.filters {
        if row.get(field.name).cloned().unwrap_or(Value::Null) != value.to_json() {
            return false;
        }
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        let hit = schema
            .searchable_fields()
            .any(|f| row.get(f.name).and_then(Value::as_str).map_or(false, |s| s.to_lowercase().contains(&needle)));
        if !hit {
            return false;
        }
    }
    true
}

fn order(schema: &ResourceSchema, a: &Record, b: &Record) -> Ordering {
    let by_id = record_id(b).cmp(&record_id(a));
    let Some(field) = schema.fields.iter().find(|f| f.column == schema.order_by) else {
        // created_at follows insertion order here
        return if schema.order_desc { by_id } else { by_id.reverse() };
    };
    let key = |r: &Record| match r.get(field.name) {
        Some(Value::Number(n)) => format!("{:020}", n.as_i64().unwrap_or_default()),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    let ord = key(a).cmp(&key(b));
    let ord = if schema.order_desc { ord.reverse() } else { ord };
    ord.then(by_id)
}

impl ResourceCommon for MemoryStore {
    async fn insert(&mut self, schema: &'static ResourceSchema, values: &[Assignment]) -> Result<i64, Error> {
        Ok(self.with(|t| {
            t.next_id += 1;
            let id = t.next_id;
            let mut row = Record::new();
            row.insert("id".into(), Value::from(id));
            for field in schema.fields {
                let value = match field.kind {
                    FieldKind::Integer if !field.is_writable() => Value::from(0),
                    _ => Value::Null,
                };
                row.insert(field.name.into(), value);
            }
            for (field, value) in values {
                row.insert(field.name.into(), value.to_json());
            }
            row.insert("createdAt".into(), now());
            row.insert("updatedAt".into(), now());
            t.rows.entry(schema.table).or_default().push(row);
            id
        }))
    }

    async fn update(&mut self, schema: &'static ResourceSchema, id: i64, values: &[Assignment]) -> Result<(), Error> {
        self.with(|t| {
            if let Some(row) = t.rows.entry(schema.table).or_default().iter_mut().find(|r| record_id(r) == Some(id)) {
                for (field, value) in values {
                    row.insert(field.name.into(), value.to_json());
                }
                row.insert("updatedAt".into(), now());
            }
        });
        Ok(())
    }

    async fn query(&mut self, schema: &'static ResourceSchema, query: &ListQuery) -> Result<Vec<Record>, Error> {
        Ok(self.with(|t| {
            let mut rows: Vec<&Record> = t.rows.get(schema.table).into_iter().flatten().filter(|r| matches(schema, r, query)).collect();
            rows.sort_by(|a, b| order(schema, a, b));
            let (skip, take) = match &query.pagination {
                Some(p) => (p.offset() as usize, p.size as usize),
                None => (0, usize::MAX),
            };
            rows.into_iter().skip(skip).take(take).map(|r| project(schema, r)).collect()
        }))
    }

    async fn count(&mut self, schema: &'static ResourceSchema, query: &ListQuery) -> Result<i64, Error> {
        Ok(self.with(|t| t.rows.get(schema.table).into_iter().flatten().filter(|r| matches(schema, r, query)).count() as i64))
    }

    async fn get(&mut self, schema: &'static ResourceSchema, id: i64) -> Result<Option<Record>, Error> {
        Ok(self.with(|t| {
            t.rows
                .get(schema.table)
                .into_iter()
                .flatten()
                .find(|r| record_id(r) == Some(id))
                .map(|r| project(schema, r))
        }))
    }

    async fn get_by(&mut self, schema: &'static ResourceSchema, field: &'static Field, value: &FieldValue) -> Result<Option<Record>, Error> {
        let value = value.to_json();
        Ok(self.with(|t| {
            t.rows
                .get(schema.table)
                .into_iter()
                .flatten()
                .find(|r| r.get(field.name) == Some(&value))
                .map(|r| project(schema, r))
        }))
    }

    async fn exists(&mut self, schema: &'static ResourceSchema, field: &'static Field, value: &FieldValue, exclude_id: Option<i64>) -> Result<bool, Error> {
        let value = value.to_json();
        Ok(self.with(|t| {
            t.rows
                .get(schema.table)
                .into_iter()
                .flatten()
                .any(|r| r.get(field.name) == Some(&value) && (exclude_id.is_none() || record_id(r) != exclude_id))
        }))
    }

    async fn increment(&mut self, schema: &'static ResourceSchema, id: i64, field: &'static Field) -> Result<(), Error> {
        self.with(|t| {
            if let Some(row) = t.rows.entry(schema.table).or_default().iter_mut().find(|r| record_id(r) == Some(id)) {
                let n = row.get(field.name).and_then(Value::as_i64).unwrap_or(0);
                row.insert(field.name.into(), Value::from(n + 1));
            }
        });
        Ok(())
    }

    async fn delete(&mut self, schema: &'static ResourceSchema, id: i64) -> Result<u64, Error> {
        Ok(self.with(|t| {
            let rows = t.rows.entry(schema.table).or_default();
            let before = rows.len();
            rows.retain(|r| record_id(r) != Some(id));
            let deleted = (before - rows.len()) as u64;
            // applications follow their job
            for child in crate::core::models::RESOURCES {
                for field in child.fields {
                    if field.kind == FieldKind::Reference(schema.name) {
                        t.rows.entry(child.table).or_default().retain(|r| r.get(field.name).and_then(Value::as_i64) != Some(id));
                    }
                }
            }
            deleted
        }))
    }

    async fn count_by_status(&mut self, schema: &'static ResourceSchema) -> Result<Vec<(String, i64)>, Error> {
        let Some(field) = schema.status() else {
            return Ok(Vec::new());
        };
        Ok(self.with(|t| {
            let mut counts: HashMap<String, i64> = HashMap::new();
            for row in t.rows.get(schema.table).into_iter().flatten() {
                if let Some(status) = row.get(field.name).and_then(Value::as_str) {
                    *counts.entry(status.to_owned()).or_default() += 1;
                }
            }
            counts.into_iter().collect()
        }))
    }
}

impl UserCommon for MemoryStore {
    async fn get_credentials(&mut self, login: &str) -> Result<Option<Credentials>, Error> {
        Ok(self.with(|t| {
            let text = |r: &Record, k: &str| r.get(k).and_then(Value::as_str).unwrap_or_default().to_owned();
            t.rows
                .get(user::SCHEMA.table)
                .into_iter()
                .flatten()
                .find(|r| text(r, "username") == login || text(r, "email") == login)
                .map(|r| Credentials {
                    id: record_id(r).unwrap_or_default(),
                    username: text(r, "username"),
                    email: text(r, "email"),
                    password: text(r, "password"),
                    role: text(r, "role"),
                    status: text(r, "status"),
                })
        }))
    }

    async fn count_users(&mut self) -> Result<i64, Error> {
        Ok(self.with(|t| t.rows.get(user::SCHEMA.table).map_or(0, |rows| rows.len() as i64)))
    }

    async fn touch_login(&mut self, id: i64) -> Result<(), Error> {
        self.with(|t| {
            if let Some(row) = t.rows.entry(user::SCHEMA.table).or_default().iter_mut().find(|r| record_id(r) == Some(id)) {
                row.insert("lastLoginAt".into(), now());
            }
        });
        Ok(())
    }
}

impl Common for MemoryStore {}

impl Store for MemoryStore {
    async fn ping(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(staged) = self.staged.take() {
            *self.shared.lock().unwrap() = staged;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

impl Manager for MemoryManager {
    type Store<'m> = MemoryStore
    where
        Self: 'm;
    type TxStore<'m> = MemoryStore
    where
        Self: 'm;

    async fn db(&self) -> Result<Self::Store<'_>, Error> {
        Ok(MemoryStore {
            shared: self.tables.clone(),
            staged: None,
        })
    }

    async fn tx(&self) -> Result<Self::TxStore<'_>, Error> {
        let staged = self.tables.lock().unwrap().clone();
        Ok(MemoryStore {
            shared: self.tables.clone(),
            staged: Some(staged),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::blog;

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let manager = MemoryManager::default();
        let title = blog::SCHEMA.field("title").unwrap();
        let mut tx = manager.tx().await.unwrap();
        tx.insert(&blog::SCHEMA, &[(title, FieldValue::Text("x".into()))]).await.unwrap();
        tx.rollback().await.unwrap();
        let mut db = manager.db().await.unwrap();
        assert_eq!(db.count(&blog::SCHEMA, &ListQuery::default()).await.unwrap(), 0);

        let mut tx = manager.tx().await.unwrap();
        tx.insert(&blog::SCHEMA, &[(title, FieldValue::Text("y".into()))]).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(db.count(&blog::SCHEMA, &ListQuery::default()).await.unwrap(), 1);
    }
}
