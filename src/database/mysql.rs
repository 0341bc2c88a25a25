use std::ops::DerefMut;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, QueryBuilder, Row, Transaction};

use crate::config::Config;
use crate::core::{
    models::{
        common::ListQuery,
        schema::{Assignment, Field, FieldKind, FieldValue, Record, ResourceSchema},
        user::{self, Credentials},
    },
    ports::repository::{Common, Manager, ResourceCommon, Store, TxStore, UserCommon},
};
use crate::error::Error;

pub struct MySqlx<C>
where
    C: DerefMut<Target = MySqlConnection>,
{
    executor: C,
}

impl<C> MySqlx<C>
where
    C: DerefMut<Target = MySqlConnection>,
{
    pub fn new(executor: C) -> Self {
        Self { executor }
    }
}

fn push_value(stmt: &mut QueryBuilder<'_, MySql>, value: &FieldValue) {
    match value.clone() {
        FieldValue::Null => stmt.push_bind(Option::<String>::None),
        FieldValue::Text(s) => stmt.push_bind(s),
        FieldValue::Integer(n) => stmt.push_bind(n),
        FieldValue::Boolean(b) => stmt.push_bind(b),
        FieldValue::Date(d) => stmt.push_bind(d),
    };
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn select_columns(schema: &ResourceSchema) -> String {
    let mut columns = vec!["id"];
    columns.extend(schema.readable_fields().map(|f| f.column));
    columns.push("created_at");
    columns.push("updated_at");
    columns.join(", ")
}

fn push_conditions(stmt: &mut QueryBuilder<'_, MySql>, schema: &ResourceSchema, query: &ListQuery) {
    stmt.push(" WHERE 1 = 1");
    if let (Some(status), Some(field)) = (&query.status, schema.status()) {
        stmt.push(format!(" AND {} = ", field.column)).push_bind(status.clone());
    }
    for (field, value) in &query.filters {
        if *value == FieldValue::Null {
            stmt.push(format!(" AND {} IS NULL", field.column));
        } else {
            stmt.push(format!(" AND {} = ", field.column));
            push_value(stmt, value);
        }
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        let mut separated = None;
        for field in schema.searchable_fields() {
            stmt.push(if separated.is_none() { " AND (" } else { " OR " });
            stmt.push(format!("{} LIKE ", field.column)).push_bind(pattern.clone());
            separated = Some(());
        }
        if separated.is_some() {
            stmt.push(")");
        }
    }
}

pub(crate) fn select_query<'a>(schema: &ResourceSchema, query: &ListQuery) -> QueryBuilder<'a, MySql> {
    let mut stmt = QueryBuilder::new(format!("SELECT {} FROM {}", select_columns(schema), schema.table));
    push_conditions(&mut stmt, schema, query);
    stmt.push(format!(
        " ORDER BY {} {}, id DESC",
        schema.order_by,
        if schema.order_desc { "DESC" } else { "ASC" }
    ));
    if let Some(pagination) = &query.pagination {
        stmt.push(" LIMIT ").push_bind(pagination.size);
        stmt.push(" OFFSET ").push_bind(pagination.offset());
    }
    stmt
}

pub(crate) fn count_query<'a>(schema: &ResourceSchema, query: &ListQuery) -> QueryBuilder<'a, MySql> {
    let mut stmt = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", schema.table));
    push_conditions(&mut stmt, schema, query);
    stmt
}

pub(crate) fn insert_query<'a>(schema: &ResourceSchema, values: &[Assignment]) -> QueryBuilder<'a, MySql> {
    let columns: Vec<&str> = values.iter().map(|(f, _)| f.column).collect();
    let mut stmt = QueryBuilder::new(format!("INSERT INTO {} ({}) VALUES (", schema.table, columns.join(", ")));
    for (i, (_, value)) in values.iter().enumerate() {
        if i > 0 {
            stmt.push(", ");
        }
        push_value(&mut stmt, value);
    }
    stmt.push(")");
    stmt
}

pub(crate) fn update_query<'a>(schema: &ResourceSchema, id: i64, values: &[Assignment]) -> QueryBuilder<'a, MySql> {
    let mut stmt = QueryBuilder::new(format!("UPDATE {} SET ", schema.table));
    for (i, (field, value)) in values.iter().enumerate() {
        if i > 0 {
            stmt.push(", ");
        }
        stmt.push(format!("{} = ", field.column));
        push_value(&mut stmt, value);
    }
    stmt.push(" WHERE id = ").push_bind(id);
    stmt
}

fn timestamp(row: &MySqlRow, column: &str) -> Result<Value, Error> {
    let ts: Option<DateTime<Utc>> = row.try_get(column)?;
    Ok(ts.map(|t| Value::from(t.to_rfc3339())).unwrap_or(Value::Null))
}

fn decode_row(schema: &ResourceSchema, row: &MySqlRow) -> Result<Record, Error> {
    let mut record = Record::new();
    record.insert("id".into(), Value::from(row.try_get::<i64, _>("id")?));
    for field in schema.readable_fields() {
        let value = match field.kind {
            FieldKind::Text | FieldKind::LongText | FieldKind::Email | FieldKind::Password | FieldKind::Choice(_) => {
                row.try_get::<Option<String>, _>(field.column)?.map(Value::from)
            }
            FieldKind::Integer | FieldKind::Reference(_) => row.try_get::<Option<i64>, _>(field.column)?.map(Value::from),
            FieldKind::Boolean => row.try_get::<Option<bool>, _>(field.column)?.map(Value::from),
            FieldKind::Date => row
                .try_get::<Option<NaiveDate>, _>(field.column)?
                .map(|d| Value::from(d.format("%Y-%m-%d").to_string())),
            FieldKind::Timestamp => Some(timestamp(row, field.column)?),
        };
        record.insert(field.name.into(), value.unwrap_or(Value::Null));
    }
    record.insert("createdAt".into(), timestamp(row, "created_at")?);
    record.insert("updatedAt".into(), timestamp(row, "updated_at")?);
    Ok(record)
}

impl<C> ResourceCommon for MySqlx<C>
where
    C: DerefMut<Target = MySqlConnection>,
{
    async fn insert(&mut self, schema: &'static ResourceSchema, values: &[Assignment]) -> Result<i64, Error> {
        let mut stmt = insert_query(schema, values);
        let res = stmt.build().execute(&mut *self.executor).await?;
        Ok(res.last_insert_id() as i64)
    }

    async fn update(&mut self, schema: &'static ResourceSchema, id: i64, values: &[Assignment]) -> Result<(), Error> {
        let mut stmt = update_query(schema, id, values);
        stmt.build().execute(&mut *self.executor).await?;
        Ok(())
    }

    async fn query(&mut self, schema: &'static ResourceSchema, query: &ListQuery) -> Result<Vec<Record>, Error> {
        let mut stmt = select_query(schema, query);
        let rows = stmt.build().fetch_all(&mut *self.executor).await?;
        rows.iter().map(|row| decode_row(schema, row)).collect()
    }

    async fn count(&mut self, schema: &'static ResourceSchema, query: &ListQuery) -> Result<i64, Error> {
        let mut stmt = count_query(schema, query);
        let total = stmt.build_query_scalar().fetch_one(&mut *self.executor).await?;
        Ok(total)
    }

    async fn get(&mut self, schema: &'static ResourceSchema, id: i64) -> Result<Option<Record>, Error> {
        let mut stmt = QueryBuilder::new(format!("SELECT {} FROM {} WHERE id = ", select_columns(schema), schema.table));
        stmt.push_bind(id);
        let row = stmt.build().fetch_optional(&mut *self.executor).await?;
        row.map(|r| decode_row(schema, &r)).transpose()
    }

    async fn get_by(&mut self, schema: &'static ResourceSchema, field: &'static Field, value: &FieldValue) -> Result<Option<Record>, Error> {
        let mut stmt = QueryBuilder::new(format!("SELECT {} FROM {} WHERE {} = ", select_columns(schema), schema.table, field.column));
        push_value(&mut stmt, value);
        stmt.push(" LIMIT 1");
        let row = stmt.build().fetch_optional(&mut *self.executor).await?;
        row.map(|r| decode_row(schema, &r)).transpose()
    }

    async fn exists(&mut self, schema: &'static ResourceSchema, field: &'static Field, value: &FieldValue, exclude_id: Option<i64>) -> Result<bool, Error> {
        let mut stmt = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} WHERE {} = ", schema.table, field.column));
        push_value(&mut stmt, value);
        if let Some(id) = exclude_id {
            stmt.push(" AND id <> ").push_bind(id);
        }
        let n: i64 = stmt.build_query_scalar().fetch_one(&mut *self.executor).await?;
        Ok(n > 0)
    }

    async fn increment(&mut self, schema: &'static ResourceSchema, id: i64, field: &'static Field) -> Result<(), Error> {
        let stmt = format!("UPDATE {} SET {col} = {col} + 1 WHERE id = ?", schema.table, col = field.column);
        query(&stmt).bind(id).execute(&mut *self.executor).await?;
        Ok(())
    }

    async fn delete(&mut self, schema: &'static ResourceSchema, id: i64) -> Result<u64, Error> {
        let stmt = format!("DELETE FROM {} WHERE id = ?", schema.table);
        let res = query(&stmt).bind(id).execute(&mut *self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn count_by_status(&mut self, schema: &'static ResourceSchema) -> Result<Vec<(String, i64)>, Error> {
        let Some(field) = schema.status() else {
            return Ok(Vec::new());
        };
        let stmt = format!("SELECT {col}, COUNT(*) FROM {} GROUP BY {col}", schema.table, col = field.column);
        let counts = query_as(&stmt).fetch_all(&mut *self.executor).await?;
        Ok(counts)
    }
}

impl<C> UserCommon for MySqlx<C>
where
    C: DerefMut<Target = MySqlConnection>,
{
    async fn get_credentials(&mut self, login: &str) -> Result<Option<Credentials>, Error> {
        let stmt = format!(
            "SELECT id, username, email, password, role, status FROM {} WHERE username = ? OR email = ? LIMIT 1",
            user::SCHEMA.table
        );
        let creds = query_as(&stmt).bind(login).bind(login).fetch_optional(&mut *self.executor).await?;
        Ok(creds)
    }

    async fn count_users(&mut self) -> Result<i64, Error> {
        let stmt = format!("SELECT COUNT(*) FROM {}", user::SCHEMA.table);
        let n = query_scalar(&stmt).fetch_one(&mut *self.executor).await?;
        Ok(n)
    }

    async fn touch_login(&mut self, id: i64) -> Result<(), Error> {
        let stmt = format!("UPDATE {} SET last_login_at = CURRENT_TIMESTAMP WHERE id = ?", user::SCHEMA.table);
        query(&stmt).bind(id).execute(&mut *self.executor).await?;
        Ok(())
    }
}

impl<C> Common for MySqlx<C> where C: DerefMut<Target = MySqlConnection> {}

impl<C> Store for MySqlx<C>
where
    C: DerefMut<Target = MySqlConnection>,
{
    async fn ping(&mut self) -> Result<(), Error> {
        query("SELECT 1").execute(&mut *self.executor).await?;
        Ok(())
    }
}

impl<'c> TxStore for MySqlx<Transaction<'c, MySql>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct MySqlxManager {
    pool: MySqlPool,
}

impl MySqlxManager {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config) -> Result<Self, Error> {
        let options = MySqlConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .username(&config.db_user)
            .password(&config.db_password)
            .database(&config.db_name);
        let pool = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await?;
        log::info!("connected to mysql at {}:{}/{}", config.db_host, config.db_port, config.db_name);
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl Manager for MySqlxManager {
    type Store<'m> = MySqlx<PoolConnection<MySql>>
    where
        Self: 'm;
    type TxStore<'m> = MySqlx<Transaction<'static, MySql>>
    where
        Self: 'm;

    async fn db(&self) -> Result<Self::Store<'_>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(MySqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore<'_>, Error> {
        let tx = self.pool.begin().await?;
        Ok(MySqlx::new(tx))
    }
}
