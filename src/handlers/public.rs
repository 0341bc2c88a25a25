use std::collections::HashMap;

use actix_web::{
    web::{Data, Json, Path, Query},
    HttpResponse,
};
use serde_json::{Map, Value};

use crate::core::{
    models::schema::{Record, ResourceSchema},
    ports::repository::{Manager, TxStore},
    services::resource,
    validation,
};
use crate::error::Error;
use crate::response::{CreateResponse, List, Success};

/// The resource a public scope serves, registered as scope data.
#[derive(Debug, Clone, Copy)]
pub struct PublicResource(pub &'static ResourceSchema);

pub async fn list<M>(target: Data<PublicResource>, Query(mut params): Query<HashMap<String, String>>, manager: Data<M>) -> Result<Json<List<Record>>, Error>
where
    M: Manager,
{
    let schema = target.0;
    params.remove("status");
    let query = validation::list_query(schema, &params)?;
    let mut db = manager.db().await?;
    let (records, total) = resource::public_records(&mut db, schema, query).await?;
    Ok(Json(List::new(records, total)))
}

pub async fn detail<M>(target: Data<PublicResource>, path: Path<(String,)>, manager: Data<M>) -> Result<Json<Success<Record>>, Error>
where
    M: Manager,
{
    let mut tx = manager.tx().await?;
    let record = resource::public_detail(&mut tx, target.0, &path.0).await?;
    tx.commit().await?;
    Ok(Json(Success::new(record)))
}

pub async fn submit<M>(target: Data<PublicResource>, Json(payload): Json<Map<String, Value>>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager,
{
    let mut db = manager.db().await?;
    let id = resource::submit_public(&mut db, target.0, &payload).await?;
    Ok(HttpResponse::Created().json(CreateResponse::new(id)))
}
