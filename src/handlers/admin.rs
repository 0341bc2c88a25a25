use std::collections::HashMap;

use actix_web::{
    web::{Data, Json, Path, Query},
    HttpResponse,
};
use serde_json::{Map, Value};

use crate::context::UserInfo;
use crate::core::{
    models::{lookup, schema::Record, schema::ResourceSchema, RESOURCES},
    ports::repository::Manager,
    services::{
        dashboard::{self, ResourceStats},
        resource,
    },
    validation,
};
use crate::error::Error;
use crate::request::StatusPatch;
use crate::response::{CreateResponse, List, Message, Success};

fn visible_to(schema: &ResourceSchema, user_info: &UserInfo) -> bool {
    !schema.admin_only || user_info.is_admin()
}

/// Resolves the `{resource}` path segment and applies the role rule.
fn authorize(name: &str, user_info: &UserInfo) -> Result<&'static ResourceSchema, Error> {
    let schema = lookup(name).ok_or_else(|| Error::NotFound(format!("resource {}", name)))?;
    if !visible_to(schema, user_info) {
        log::warn!("user {} ({}) denied access to {}", user_info.id, user_info.role, name);
        return Err(Error::Forbidden);
    }
    Ok(schema)
}

pub async fn list<M>(
    user_info: UserInfo,
    path: Path<(String,)>,
    Query(params): Query<HashMap<String, String>>,
    manager: Data<M>,
) -> Result<Json<List<Record>>, Error>
where
    M: Manager,
{
    let schema = authorize(&path.0, &user_info)?;
    let query = validation::list_query(schema, &params)?;
    let mut db = manager.db().await?;
    let (records, total) = resource::list_records(&mut db, schema, &query).await?;
    Ok(Json(List::new(records, total)))
}

pub async fn detail<M>(user_info: UserInfo, path: Path<(String, i64)>, manager: Data<M>) -> Result<Json<Success<Record>>, Error>
where
    M: Manager,
{
    let (name, id) = path.into_inner();
    let schema = authorize(&name, &user_info)?;
    let mut db = manager.db().await?;
    let record = resource::record_detail(&mut db, schema, id).await?;
    Ok(Json(Success::new(record)))
}

pub async fn create<M>(user_info: UserInfo, path: Path<(String,)>, Json(payload): Json<Map<String, Value>>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager,
{
    let schema = authorize(&path.0, &user_info)?;
    let mut db = manager.db().await?;
    let id = resource::create_record(&mut db, schema, &payload).await?;
    Ok(HttpResponse::Created().json(CreateResponse::new(id)))
}

pub async fn update<M>(
    user_info: UserInfo,
    path: Path<(String, i64)>,
    Json(payload): Json<Map<String, Value>>,
    manager: Data<M>,
) -> Result<Json<Success<Record>>, Error>
where
    M: Manager,
{
    let (name, id) = path.into_inner();
    let schema = authorize(&name, &user_info)?;
    let mut db = manager.db().await?;
    let record = resource::update_record(&mut db, schema, id, &payload).await?;
    Ok(Json(Success::new(record)))
}

pub async fn update_status<M>(
    user_info: UserInfo,
    path: Path<(String, i64)>,
    Json(StatusPatch { status }): Json<StatusPatch>,
    manager: Data<M>,
) -> Result<Json<Success<Record>>, Error>
where
    M: Manager,
{
    let (name, id) = path.into_inner();
    let schema = authorize(&name, &user_info)?;
    let mut db = manager.db().await?;
    let record = resource::change_status(&mut db, schema, id, &status).await?;
    Ok(Json(Success::new(record)))
}

pub async fn delete<M>(user_info: UserInfo, path: Path<(String, i64)>, manager: Data<M>) -> Result<Json<Message>, Error>
where
    M: Manager,
{
    let (name, id) = path.into_inner();
    let schema = authorize(&name, &user_info)?;
    if schema.name == "users" && id == user_info.id {
        return Err(Error::ValidationError("you cannot delete your own account".into()));
    }
    let mut db = manager.db().await?;
    resource::delete_record(&mut db, schema, id).await?;
    Ok(Json(Message::new(format!("{} {} deleted", schema.name, id))))
}

pub async fn schemas(user_info: UserInfo) -> Json<Success<Vec<&'static ResourceSchema>>> {
    let visible = RESOURCES.iter().copied().filter(|s| visible_to(s, &user_info)).collect();
    Json(Success::new(visible))
}

pub async fn schema(user_info: UserInfo, path: Path<(String,)>) -> Result<Json<Success<&'static ResourceSchema>>, Error> {
    let schema = authorize(&path.0, &user_info)?;
    Ok(Json(Success::new(schema)))
}

pub async fn dashboard<M>(user_info: UserInfo, manager: Data<M>) -> Result<Json<Success<Vec<ResourceStats>>>, Error>
where
    M: Manager,
{
    let mut db = manager.db().await?;
    let stats = dashboard::overview(&mut db)
        .await?
        .into_iter()
        .filter(|s| lookup(s.resource).map_or(false, |schema| visible_to(schema, &user_info)))
        .collect();
    Ok(Json(Success::new(stats)))
}
