use serde::Serialize;
use sqlx::FromRow;

use super::schema::{Field, FieldKind, ResourceSchema};

pub const STATUSES: &[&str] = &["active", "inactive"];
pub const ROLES: &[&str] = &["admin", "editor"];

pub const ROLE_ADMIN: &str = "admin";

static FIELDS: &[Field] = &[
    Field::new("username", "username", "Username", FieldKind::Text).required().unique().searchable(),
    Field::new("email", "email", "Email", FieldKind::Email).required().unique().searchable(),
    Field::new("password", "password", "Password", FieldKind::Password).required().write_only(),
    Field::new("role", "role", "Role", FieldKind::Choice(ROLES)).filterable().default_value("editor"),
    Field::new("status", "status", "Status", FieldKind::Choice(STATUSES))
        .filterable()
        .default_value("active"),
    Field::new("lastLoginAt", "last_login_at", "Last login", FieldKind::Timestamp).read_only(),
];

pub static SCHEMA: ResourceSchema = ResourceSchema {
    name: "users",
    table: "users",
    label: "Users",
    fields: FIELDS,
    status_field: Some("status"),
    public_status: None,
    slug_field: None,
    views_field: None,
    public_submit: false,
    admin_only: true,
    order_by: "created_at",
    order_desc: true,
};

/// The row needed to check a login; never serialized with the password.
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<Credentials> for Profile {
    fn from(c: Credentials) -> Self {
        Self {
            id: c.id,
            username: c.username,
            email: c.email,
            role: c.role,
        }
    }
}
