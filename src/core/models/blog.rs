use super::schema::{Field, FieldKind, ResourceSchema};

pub const STATUSES: &[&str] = &["draft", "published"];

static FIELDS: &[Field] = &[
    Field::new("title", "title", "Title", FieldKind::Text).required().searchable(),
    Field::new("urlTitle", "url_title", "URL title", FieldKind::Text).required().unique(),
    Field::new("description", "description", "Description", FieldKind::LongText)
        .searchable()
        .aliases(&["excerpt"]),
    Field::new("content", "content", "Content", FieldKind::LongText).required().searchable(),
    Field::new("author", "author", "Author", FieldKind::Text).required(),
    Field::new("category", "category", "Category", FieldKind::Text).filterable(),
    Field::new("tags", "tags", "Tags", FieldKind::Text),
    Field::new("image", "image", "Image", FieldKind::Text),
    Field::new("featured", "featured", "Featured", FieldKind::Boolean)
        .filterable()
        .default_value("false"),
    Field::new("status", "status", "Status", FieldKind::Choice(STATUSES))
        .filterable()
        .default_value("published"),
    Field::new("views", "views", "Views", FieldKind::Integer).read_only(),
];

pub static SCHEMA: ResourceSchema = ResourceSchema {
    name: "blogs",
    table: "blogs",
    label: "Blogs",
    fields: FIELDS,
    status_field: Some("status"),
    public_status: Some("published"),
    slug_field: Some("urlTitle"),
    views_field: Some("views"),
    public_submit: false,
    admin_only: false,
    order_by: "created_at",
    order_desc: true,
};
