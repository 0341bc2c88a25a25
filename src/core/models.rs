pub mod application;
pub mod blog;
pub mod common;
pub mod contact;
pub mod job;
pub mod schema;
pub mod service;
pub mod setting;
pub mod team;
pub mod user;

use schema::ResourceSchema;

pub static RESOURCES: &[&ResourceSchema] = &[
    &blog::SCHEMA,
    &job::SCHEMA,
    &application::SCHEMA,
    &contact::SCHEMA,
    &service::SCHEMA,
    &team::SCHEMA,
    &user::SCHEMA,
    &setting::SCHEMA,
];

pub fn lookup(name: &str) -> Option<&'static ResourceSchema> {
    RESOURCES.iter().copied().find(|s| s.name == name)
}
