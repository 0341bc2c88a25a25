use super::schema::{Field, FieldKind, ResourceSchema};

pub const STATUSES: &[&str] = &["new", "read", "replied"];

static FIELDS: &[Field] = &[
    Field::new("name", "name", "Name", FieldKind::Text).required().searchable(),
    Field::new("email", "email", "Email", FieldKind::Email).required().searchable(),
    Field::new("phone", "phone", "Phone", FieldKind::Text),
    Field::new("company", "company", "Company", FieldKind::Text),
    Field::new("subject", "subject", "Subject", FieldKind::Text).searchable(),
    Field::new("message", "message", "Message", FieldKind::LongText).required(),
    Field::new("status", "status", "Status", FieldKind::Choice(STATUSES))
        .filterable()
        .default_value("new"),
];

pub static SCHEMA: ResourceSchema = ResourceSchema {
    name: "contacts",
    table: "contacts",
    label: "Contacts",
    fields: FIELDS,
    status_field: Some("status"),
    public_status: None,
    slug_field: None,
    views_field: None,
    public_submit: true,
    admin_only: false,
    order_by: "created_at",
    order_desc: true,
};
