use crate::core::models::{
    common::ListQuery,
    schema::{Assignment, Field, FieldValue, Record, ResourceSchema},
    user::Credentials,
};
use crate::error::Error;

pub trait ResourceCommon {
    async fn insert(&mut self, schema: &'static ResourceSchema, values: &[Assignment]) -> Result<i64, Error>;
    async fn update(&mut self, schema: &'static ResourceSchema, id: i64, values: &[Assignment]) -> Result<(), Error>;
    async fn query(&mut self, schema: &'static ResourceSchema, query: &ListQuery) -> Result<Vec<Record>, Error>;
    async fn count(&mut self, schema: &'static ResourceSchema, query: &ListQuery) -> Result<i64, Error>;
    async fn get(&mut self, schema: &'static ResourceSchema, id: i64) -> Result<Option<Record>, Error>;
    async fn get_by(&mut self, schema: &'static ResourceSchema, field: &'static Field, value: &FieldValue) -> Result<Option<Record>, Error>;
    async fn exists(&mut self, schema: &'static ResourceSchema, field: &'static Field, value: &FieldValue, exclude_id: Option<i64>) -> Result<bool, Error>;
    async fn increment(&mut self, schema: &'static ResourceSchema, id: i64, field: &'static Field) -> Result<(), Error>;
    async fn delete(&mut self, schema: &'static ResourceSchema, id: i64) -> Result<u64, Error>;
    async fn count_by_status(&mut self, schema: &'static ResourceSchema) -> Result<Vec<(String, i64)>, Error>;
}

pub trait UserCommon {
    async fn get_credentials(&mut self, login: &str) -> Result<Option<Credentials>, Error>;
    async fn count_users(&mut self) -> Result<i64, Error>;
    async fn touch_login(&mut self, id: i64) -> Result<(), Error>;
}

pub trait Common: ResourceCommon + UserCommon {}

pub trait Store: Common {
    async fn ping(&mut self) -> Result<(), Error>;
}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

/// Hands out pooled connections and transactions. Injected into handlers instead of a global pool.
pub trait Manager {
    type Store<'m>: Store
    where
        Self: 'm;
    type TxStore<'m>: TxStore
    where
        Self: 'm;

    async fn db(&self) -> Result<Self::Store<'_>, Error>;
    async fn tx(&self) -> Result<Self::TxStore<'_>, Error>;
}
