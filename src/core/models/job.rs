use super::schema::{Field, FieldKind, ResourceSchema};

pub const STATUSES: &[&str] = &["active", "inactive"];
pub const TYPES: &[&str] = &["full-time", "part-time", "contract", "internship"];

static FIELDS: &[Field] = &[
    Field::new("title", "title", "Title", FieldKind::Text).required().searchable(),
    Field::new("department", "department", "Department", FieldKind::Text).filterable(),
    Field::new("location", "location", "Location", FieldKind::Text).filterable(),
    Field::new("type", "job_type", "Employment type", FieldKind::Choice(TYPES))
        .filterable()
        .default_value("full-time"),
    Field::new("experience", "experience", "Experience", FieldKind::Text),
    Field::new("salary", "salary", "Salary", FieldKind::Text),
    Field::new("description", "description", "Description", FieldKind::LongText).required().searchable(),
    Field::new("requirements", "requirements", "Requirements", FieldKind::LongText),
    Field::new("responsibilities", "responsibilities", "Responsibilities", FieldKind::LongText),
    Field::new("deadline", "deadline", "Deadline", FieldKind::Date),
    Field::new("status", "status", "Status", FieldKind::Choice(STATUSES))
        .filterable()
        .default_value("active"),
];

pub static SCHEMA: ResourceSchema = ResourceSchema {
    name: "jobs",
    table: "jobs",
    label: "Jobs",
    fields: FIELDS,
    status_field: Some("status"),
    public_status: Some("active"),
    slug_field: None,
    views_field: None,
    public_submit: false,
    admin_only: false,
    order_by: "created_at",
    order_desc: true,
};
