use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use validator::validate_email;

use crate::core::models::common::{ListQuery, Pagination};
use crate::core::models::schema::{Assignment, Field, FieldKind, FieldValue, ResourceSchema};
use crate::error::Error;

pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits an `i64` at the largest page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Converts one JSON value into the typed value a field of this kind accepts.
pub fn convert(field: &Field, value: &Value) -> Result<FieldValue, Error> {
    if value.is_null() {
        return Ok(FieldValue::Null);
    }
    let invalid = |expected: &str| Error::ValidationError(format!("{} must be {}", field.name, expected));
    match field.kind {
        FieldKind::Text | FieldKind::LongText | FieldKind::Email | FieldKind::Password | FieldKind::Choice(_) => {
            let s = value.as_str().ok_or_else(|| invalid("a string"))?;
            if let Some(max) = field.max_len() {
                if s.chars().count() > max {
                    return Err(Error::ValidationError(format!("{} must be at most {} characters", field.name, max)));
                }
            }
            if field.kind == FieldKind::Email && !s.trim().is_empty() && !validate_email(s.trim()) {
                return Err(invalid("a valid email address"));
            }
            if let FieldKind::Choice(options) = field.kind {
                if !options.contains(&s) {
                    return Err(invalid(&format!("one of: {}", options.join(", "))));
                }
            }
            Ok(FieldValue::Text(s.to_owned()))
        }
        FieldKind::Integer | FieldKind::Reference(_) => match value {
            Value::Number(n) => n.as_i64().map(FieldValue::Integer).ok_or_else(|| invalid("an integer")),
            Value::String(s) if s.trim().is_empty() => Ok(FieldValue::Null),
            Value::String(s) => s.trim().parse::<i64>().map(FieldValue::Integer).map_err(|_| invalid("an integer")),
            _ => Err(invalid("an integer")),
        },
        FieldKind::Boolean => match value {
            Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
            Value::Number(n) if n.as_i64() == Some(0) || n.as_i64() == Some(1) => Ok(FieldValue::Boolean(n.as_i64() == Some(1))),
            Value::String(s) => match s.as_str() {
                "true" | "1" => Ok(FieldValue::Boolean(true)),
                "false" | "0" => Ok(FieldValue::Boolean(false)),
                _ => Err(invalid("a boolean")),
            },
            _ => Err(invalid("a boolean")),
        },
        FieldKind::Date => {
            let s = value.as_str().ok_or_else(|| invalid("a date (YYYY-MM-DD)"))?;
            if s.trim().is_empty() {
                return Ok(FieldValue::Null);
            }
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| invalid("a date (YYYY-MM-DD)"))
        }
        FieldKind::Timestamp => Err(Error::ValidationError(format!("{} is read-only", field.name))),
    }
}

/// Collects the allowlisted, writable entries of a payload. Unknown keys are dropped.
fn writable_entries<'p>(schema: &ResourceSchema, payload: &'p Map<String, Value>) -> Vec<(&'static Field, &'p Value)> {
    let mut entries: Vec<(&'static Field, &'p Value)> = Vec::new();
    for (key, value) in payload {
        if let Some(field) = schema.field_for_key(key) {
            if !field.is_writable() {
                continue;
            }
            // the canonical name wins over an alias
            if let Some(pos) = entries.iter().position(|(f, _)| f.name == field.name) {
                if key == field.name {
                    entries[pos] = (field, value);
                }
                continue;
            }
            entries.push((field, value));
        }
    }
    entries
}

/// Validates a create payload: every required field present, every value of the right kind,
/// defaults filled in for absent fields.
pub fn for_create(schema: &ResourceSchema, payload: &Map<String, Value>) -> Result<Vec<Assignment>, Error> {
    let entries = writable_entries(schema, payload);
    let missing: Vec<&str> = schema
        .fields
        .iter()
        .filter(|f| f.required && f.is_writable())
        .filter(|f| entries.iter().find(|(e, _)| e.name == f.name).map_or(true, |(_, v)| is_blank(v)))
        .map(|f| f.name)
        .collect();
    if !missing.is_empty() {
        return Err(Error::ValidationError(format!("Missing required fields: {}", missing.join(", "))));
    }
    let mut assignments = Vec::with_capacity(schema.fields.len());
    for field in schema.fields.iter().filter(|f| f.is_writable()) {
        match entries.iter().find(|(e, _)| e.name == field.name) {
            Some((_, value)) if !is_blank(value) || field.default.is_none() => assignments.push((field, convert(field, value)?)),
            _ => {
                if let Some(default) = field.default {
                    assignments.push((field, convert(field, &Value::from(default))?));
                }
            }
        }
    }
    Ok(assignments)
}

/// Fields whose column can never hold NULL: required ones, defaulted ones and choices.
fn keeps_a_value(field: &Field) -> bool {
    field.required || field.default.is_some() || matches!(field.kind, FieldKind::Choice(_))
}

/// Validates an update payload: only provided fields change, and fields that always carry a
/// value may not be blanked.
pub fn for_update(schema: &ResourceSchema, payload: &Map<String, Value>) -> Result<Vec<Assignment>, Error> {
    let entries = writable_entries(schema, payload);
    let blanked: Vec<&str> = entries.iter().filter(|(f, v)| keeps_a_value(f) && is_blank(v)).map(|(f, _)| f.name).collect();
    if !blanked.is_empty() {
        return Err(Error::ValidationError(format!("Fields cannot be empty: {}", blanked.join(", "))));
    }
    let mut assignments = Vec::with_capacity(entries.len());
    for (field, value) in entries {
        assignments.push((field, convert(field, value)?));
    }
    if assignments.is_empty() {
        return Err(Error::ValidationError("No updatable fields provided".into()));
    }
    Ok(assignments)
}

pub fn status(schema: &ResourceSchema, status: &str) -> Result<Assignment, Error> {
    let field = schema
        .status()
        .ok_or_else(|| Error::ValidationError(format!("{} have no status", schema.name)))?;
    match convert(field, &Value::from(status)) {
        Ok(value) => Ok((field, value)),
        Err(_) => Err(Error::ValidationError(format!("Invalid status '{}', expected one of: {}", status, schema.statuses().join(", ")))),
    }
}

fn parse_positive(params: &HashMap<String, String>, key: &str) -> Result<Option<i64>, Error> {
    match params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(Error::ValidationError(format!("{} must be a positive integer", key))),
        },
    }
}

/// Builds a list query from query-string parameters: `status`, `search`, `page`, `limit`
/// (or `size`) and any filterable field by name.
pub fn list_query(schema: &ResourceSchema, params: &HashMap<String, String>) -> Result<ListQuery, Error> {
    let mut query = ListQuery::default();
    if let Some(status) = params.get("status").filter(|s| !s.is_empty() && s.as_str() != "all") {
        self::status(schema, status)?;
        query.status = Some(status.clone());
    }
    query.search = params.get("search").map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
    for field in schema.fields.iter().filter(|f| f.filterable && Some(f.name) != schema.status_field) {
        if let Some(raw) = params.get(field.name).filter(|s| !s.is_empty() && s.as_str() != "all") {
            query.filters.push((field, convert(field, &Value::from(raw.as_str()))?));
        }
    }
    let size = match parse_positive(params, "limit")? {
        Some(n) => Some(n),
        None => parse_positive(params, "size")?,
    };
    let page = parse_positive(params, "page")?;
    if page.map_or(false, |p| p > MAX_PAGE) {
        return Err(Error::ValidationError(format!("page must be at most {}", MAX_PAGE)));
    }
    if page.is_some() || size.is_some() {
        query.pagination = Some(Pagination {
            page: page.unwrap_or(1),
            size: size.unwrap_or(10).min(MAX_PAGE_SIZE),
        });
    }
    Ok(query)
}
