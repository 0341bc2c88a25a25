use super::schema::{Field, FieldKind, ResourceSchema};

static FIELDS: &[Field] = &[
    Field::new("key", "setting_key", "Key", FieldKind::Text).required().unique().searchable(),
    Field::new("value", "setting_value", "Value", FieldKind::LongText),
    Field::new("description", "description", "Description", FieldKind::Text),
];

pub static SCHEMA: ResourceSchema = ResourceSchema {
    name: "settings",
    table: "settings",
    label: "Settings",
    fields: FIELDS,
    status_field: None,
    public_status: None,
    slug_field: None,
    views_field: None,
    public_submit: false,
    admin_only: true,
    order_by: "setting_key",
    order_desc: false,
};
