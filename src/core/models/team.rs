use super::schema::{Field, FieldKind, ResourceSchema};

pub const STATUSES: &[&str] = &["active", "inactive"];

static FIELDS: &[Field] = &[
    Field::new("name", "name", "Name", FieldKind::Text).required().searchable(),
    Field::new("position", "position", "Position", FieldKind::Text).required().searchable(),
    Field::new("bio", "bio", "Bio", FieldKind::LongText),
    Field::new("image", "image", "Image", FieldKind::Text),
    Field::new("email", "email", "Email", FieldKind::Email),
    Field::new("linkedin", "linkedin", "LinkedIn", FieldKind::Text),
    Field::new("displayOrder", "display_order", "Display order", FieldKind::Integer).default_value("0"),
    Field::new("status", "status", "Status", FieldKind::Choice(STATUSES))
        .filterable()
        .default_value("active"),
];

pub static SCHEMA: ResourceSchema = ResourceSchema {
    name: "team",
    table: "team_members",
    label: "Team members",
    fields: FIELDS,
    status_field: Some("status"),
    public_status: Some("active"),
    slug_field: None,
    views_field: None,
    public_submit: false,
    admin_only: false,
    order_by: "display_order",
    order_desc: false,
};
