use super::schema::{Field, FieldKind, ResourceSchema};

pub const STATUSES: &[&str] = &["active", "inactive"];

static FIELDS: &[Field] = &[
    Field::new("title", "title", "Title", FieldKind::Text).required().searchable(),
    Field::new("slug", "slug", "Slug", FieldKind::Text).required().unique(),
    Field::new("description", "description", "Description", FieldKind::LongText).required().searchable(),
    Field::new("icon", "icon", "Icon", FieldKind::Text),
    Field::new("image", "image", "Image", FieldKind::Text),
    Field::new("features", "features", "Features", FieldKind::LongText),
    Field::new("displayOrder", "display_order", "Display order", FieldKind::Integer).default_value("0"),
    Field::new("status", "status", "Status", FieldKind::Choice(STATUSES))
        .filterable()
        .default_value("active"),
];

pub static SCHEMA: ResourceSchema = ResourceSchema {
    name: "services",
    table: "services",
    label: "Services",
    fields: FIELDS,
    status_field: Some("status"),
    public_status: Some("active"),
    slug_field: Some("slug"),
    views_field: None,
    public_submit: false,
    admin_only: false,
    order_by: "display_order",
    order_desc: false,
};
