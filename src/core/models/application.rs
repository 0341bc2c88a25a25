use super::schema::{Field, FieldKind, ResourceSchema};

pub const STATUSES: &[&str] = &["pending", "reviewed", "shortlisted", "rejected"];

static FIELDS: &[Field] = &[
    Field::new("jobId", "job_id", "Job", FieldKind::Reference("jobs")).required().filterable(),
    Field::new("name", "name", "Name", FieldKind::Text).required().searchable(),
    Field::new("email", "email", "Email", FieldKind::Email).required().searchable(),
    Field::new("phone", "phone", "Phone", FieldKind::Text),
    Field::new("resume", "resume", "Resume", FieldKind::Text),
    Field::new("coverLetter", "cover_letter", "Cover letter", FieldKind::LongText),
    Field::new("status", "status", "Status", FieldKind::Choice(STATUSES))
        .filterable()
        .default_value("pending"),
];

pub static SCHEMA: ResourceSchema = ResourceSchema {
    name: "applications",
    table: "applications",
    label: "Applications",
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
