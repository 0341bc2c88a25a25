use serde_json::{Map, Value};

use crate::core::{
    models::{
        common::ListQuery,
        lookup,
        schema::{record_id, Assignment, FieldKind, FieldValue, Record, ResourceSchema},
    },
    ports::repository::{ResourceCommon, Store, TxStore},
    services::auth::hash_password,
    validation,
};
use crate::error::Error;

fn not_found(schema: &ResourceSchema, key: impl std::fmt::Display) -> Error {
    Error::NotFound(format!("{} {}", schema.name, key))
}

/// Passwords never reach the store in clear text.
fn hash_secrets(values: &mut [Assignment]) {
    for (field, value) in values.iter_mut() {
        if field.kind == FieldKind::Password {
            if let FieldValue::Text(plain) = value {
                let hashed = hash_password(plain);
                *value = FieldValue::Text(hashed);
            }
        }
    }
}

async fn check_unique<S>(store: &mut S, schema: &'static ResourceSchema, values: &[Assignment], exclude_id: Option<i64>) -> Result<(), Error>
where
    S: Store,
{
    for (field, value) in values.iter().filter(|(f, v)| f.unique && *v != FieldValue::Null) {
        if ResourceCommon::exists(store, schema, *field, value, exclude_id).await? {
            return Err(Error::ValidationError(format!("{} '{}' already exists", field.name, value.to_json())));
        }
    }
    Ok(())
}

async fn check_references<S>(store: &mut S, values: &[Assignment]) -> Result<(), Error>
where
    S: Store,
{
    for (field, value) in values {
        if let (FieldKind::Reference(target), FieldValue::Integer(id)) = (field.kind, value) {
            let target = lookup(target).ok_or_else(|| Error::ServerError(format!("unknown resource {}", target)))?;
            if ResourceCommon::get(store, target, *id).await?.is_none() {
                return Err(Error::ValidationError(format!("{} {} does not exist", field.name, id)));
            }
        }
    }
    Ok(())
}

pub async fn list_records<S>(store: &mut S, schema: &'static ResourceSchema, query: &ListQuery) -> Result<(Vec<Record>, i64), Error>
where
    S: Store,
{
    let total = ResourceCommon::count(store, schema, query).await?;
    let records = ResourceCommon::query(store, schema, query).await?;
    Ok((records, total))
}

pub async fn record_detail<S>(store: &mut S, schema: &'static ResourceSchema, id: i64) -> Result<Record, Error>
where
    S: Store,
{
    ResourceCommon::get(store, schema, id).await?.ok_or_else(|| not_found(schema, id))
}

pub async fn create_record<S>(store: &mut S, schema: &'static ResourceSchema, payload: &Map<String, Value>) -> Result<i64, Error>
where
    S: Store,
{
    let mut values = validation::for_create(schema, payload)?;
    check_unique(store, schema, &values, None).await?;
    check_references(store, &values).await?;
    hash_secrets(&mut values);
    let id = ResourceCommon::insert(store, schema, &values).await?;
    log::info!("created {} {}", schema.name, id);
    Ok(id)
}

pub async fn update_record<S>(store: &mut S, schema: &'static ResourceSchema, id: i64, payload: &Map<String, Value>) -> Result<Record, Error>
where
    S: Store,
{
    let mut values = validation::for_update(schema, payload)?;
    record_detail(store, schema, id).await?;
    check_unique(store, schema, &values, Some(id)).await?;
    check_references(store, &values).await?;
    hash_secrets(&mut values);
    ResourceCommon::update(store, schema, id, &values).await?;
    log::info!("updated {} {}", schema.name, id);
    record_detail(store, schema, id).await
}

pub async fn change_status<S>(store: &mut S, schema: &'static ResourceSchema, id: i64, status: &str) -> Result<Record, Error>
where
    S: Store,
{
    let value = validation::status(schema, status)?;
    record_detail(store, schema, id).await?;
    ResourceCommon::update(store, schema, id, &[value]).await?;
    log::info!("{} {} is now {}", schema.name, id, status);
    record_detail(store, schema, id).await
}

pub async fn delete_record<S>(store: &mut S, schema: &'static ResourceSchema, id: i64) -> Result<(), Error>
where
    S: Store,
{
    let deleted = ResourceCommon::delete(store, schema, id).await?;
    if deleted == 0 {
        return Err(not_found(schema, id));
    }
    log::info!("deleted {} {}", schema.name, id);
    Ok(())
}

fn is_public(schema: &ResourceSchema, record: &Record) -> bool {
    match (schema.status_field, schema.public_status) {
        (Some(field), Some(public)) => record.get(field).and_then(|v| v.as_str()) == Some(public),
        _ => true,
    }
}

/// Lists what the public site may show: only rows in the public status.
pub async fn public_records<S>(store: &mut S, schema: &'static ResourceSchema, mut query: ListQuery) -> Result<(Vec<Record>, i64), Error>
where
    S: Store,
{
    query.status = schema.public_status.map(str::to_owned);
    list_records(store, schema, &query).await
}

/// Resolves a public detail key (slug when the resource has one, id otherwise) and counts
/// the view when the resource tracks views. Runs inside the caller's transaction.
pub async fn public_detail<T>(tx: &mut T, schema: &'static ResourceSchema, key: &str) -> Result<Record, Error>
where
    T: TxStore,
{
    let record = match schema.slug_field.and_then(|name| schema.field(name)) {
        Some(field) => ResourceCommon::get_by(tx, schema, field, &FieldValue::Text(key.to_owned())).await?,
        None => match key.parse::<i64>() {
            Ok(id) => ResourceCommon::get(tx, schema, id).await?,
            Err(_) => None,
        },
    };
    let record = record.filter(|r| is_public(schema, r)).ok_or_else(|| not_found(schema, key))?;
    let id = record_id(&record).ok_or_else(|| Error::ServerError(format!("{} without id", schema.name)))?;
    match schema.views_field.and_then(|name| schema.field(name)) {
        Some(views) => {
            ResourceCommon::increment(tx, schema, id, views).await?;
            record_detail(tx, schema, id).await
        }
        None => Ok(record),
    }
}

/// Accepts a submission from the public site. The client cannot pick the status, and
/// referenced rows must be publicly visible.
pub async fn submit_public<S>(store: &mut S, schema: &'static ResourceSchema, payload: &Map<String, Value>) -> Result<i64, Error>
where
    S: Store,
{
    if !schema.public_submit {
        return Err(not_found(schema, "submission"));
    }
    let mut payload = payload.clone();
    if let Some(status) = schema.status_field {
        payload.remove(status);
    }
    for field in schema.fields {
        if let FieldKind::Reference(target) = field.kind {
            let target = lookup(target).ok_or_else(|| Error::ServerError(format!("unknown resource {}", target)))?;
            let value = match payload.get(field.name) {
                Some(v) => validation::convert(field, v)?,
                None => continue,
            };
            if let FieldValue::Integer(id) = value {
                let visible = ResourceCommon::get(store, target, id).await?.map_or(false, |r| is_public(target, &r));
                if !visible {
                    return Err(Error::ValidationError(format!("{} {} is not open", field.name, id)));
                }
            }
        }
    }
    create_record(store, schema, &payload).await
}
