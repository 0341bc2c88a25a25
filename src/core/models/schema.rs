use chrono::NaiveDate;
use serde::Serialize;

/// The kind of a field decides how payload values are validated, how they are
/// bound into SQL and how columns are decoded back into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    LongText,
    Email,
    Integer,
    Boolean,
    Date,
    Timestamp,
    Password,
    Choice(&'static [&'static str]),
    Reference(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Access {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: &'static str,
    #[serde(skip)]
    pub column: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub access: Access,
    pub required: bool,
    pub searchable: bool,
    pub filterable: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    #[serde(skip_serializing_if = "no_aliases")]
    pub aliases: &'static [&'static str],
}

fn no_aliases(aliases: &&'static [&'static str]) -> bool {
    aliases.is_empty()
}

impl Field {
    pub const fn new(name: &'static str, column: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            label,
            kind,
            access: Access::ReadWrite,
            required: false,
            searchable: false,
            filterable: false,
            unique: false,
            default: None,
            aliases: &[],
        }
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn searchable(self) -> Self {
        Self { searchable: true, ..self }
    }

    pub const fn filterable(self) -> Self {
        Self { filterable: true, ..self }
    }

    pub const fn unique(self) -> Self {
        Self { unique: true, ..self }
    }

    pub const fn read_only(self) -> Self {
        Self { access: Access::ReadOnly, ..self }
    }

    pub const fn write_only(self) -> Self {
        Self { access: Access::WriteOnly, ..self }
    }

    pub const fn default_value(self, value: &'static str) -> Self {
        Self { default: Some(value), ..self }
    }

    pub const fn aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    pub fn is_writable(&self) -> bool {
        self.access != Access::ReadOnly
    }

    pub fn is_readable(&self) -> bool {
        self.access != Access::WriteOnly
    }

    /// Text-like fields are compared with LIKE in searches and are limited to a VARCHAR(255).
    pub fn max_len(&self) -> Option<usize> {
        match self.kind {
            FieldKind::Text | FieldKind::Email => Some(255),
            _ => None,
        }
    }

    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            FieldKind::Choice(opts) => Some(opts),
            _ => None,
        }
    }
}

/// Static description of one resource. Everything the generic controller
/// needs (column allowlist, required fields, visibility) lives here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSchema {
    pub name: &'static str,
    #[serde(skip)]
    pub table: &'static str,
    pub label: &'static str,
    pub fields: &'static [Field],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug_field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views_field: Option<&'static str>,
    pub public_submit: bool,
    pub admin_only: bool,
    #[serde(skip)]
    pub order_by: &'static str,
    #[serde(skip)]
    pub order_desc: bool,
}

impl ResourceSchema {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks a payload key up by name or by one of the field's aliases.
    pub fn field_for_key(&self, key: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == key || f.aliases.contains(&key))
    }

    pub fn status(&self) -> Option<&'static Field> {
        self.status_field.and_then(|name| self.field(name))
    }

    pub fn statuses(&self) -> &'static [&'static str] {
        self.status().and_then(|f| f.options()).unwrap_or(&[])
    }

    pub fn readable_fields(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| f.is_readable())
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| f.searchable)
    }
}

/// A typed value produced by validation and consumed by the stores.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Boolean(bool),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Text(s) => serde_json::Value::from(s.as_str()),
            FieldValue::Integer(n) => serde_json::Value::from(*n),
            FieldValue::Boolean(b) => serde_json::Value::from(*b),
            FieldValue::Date(d) => serde_json::Value::from(d.format("%Y-%m-%d").to_string()),
        }
    }
}

pub type Assignment = (&'static Field, FieldValue);

/// A record as it leaves the store: JSON keyed by field name plus `id`, `createdAt` and `updatedAt`.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(|v| v.as_i64())
}
