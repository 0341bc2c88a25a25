pub mod admin;
pub mod public;

use actix_web::{
    web::{Data, Json},
    HttpResponse,
};
use chrono::Duration;
use serde::Serialize;

use crate::context::UserInfo;
use crate::core::{
    models::{schema::Record, user},
    ports::repository::{Manager, Store},
    services::{auth, resource},
};
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::request::Login;
use crate::response::{LoginResponse, Success};

/// Token settings shared by the login handler.
pub struct Auth {
    pub tokener: JWT,
    pub ttl: Duration,
}

impl Auth {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            tokener: JWT::new(secret.to_owned()),
            ttl,
        }
    }
}

pub async fn login<M>(Json(Login { username, password }): Json<Login>, manager: Data<M>, tokens: Data<Auth>) -> Result<HttpResponse, Error>
where
    M: Manager,
{
    let mut db = manager.db().await?;
    let (token, profile) = auth::login(&mut db, &tokens.tokener, username.trim(), &password, tokens.ttl).await?;
    Ok(HttpResponse::Ok().json(LoginResponse::new(token, profile)))
}

pub async fn me<M>(user_info: UserInfo, manager: Data<M>) -> Result<Json<Success<Record>>, Error>
where
    M: Manager,
{
    let mut db = manager.db().await?;
    let record = resource::record_detail(&mut db, &user::SCHEMA, user_info.id).await?;
    Ok(Json(Success::new(record)))
}

#[derive(Serialize)]
struct Health {
    success: bool,
    status: &'static str,
    database: &'static str,
}

pub async fn health<M>(manager: Data<M>) -> HttpResponse
where
    M: Manager,
{
    let database_up = match manager.db().await {
        Ok(mut db) => db.ping().await.is_ok(),
        Err(_) => false,
    };
    if database_up {
        HttpResponse::Ok().json(Health {
            success: true,
            status: "ok",
            database: "up",
        })
    } else {
        log::warn!("health check failed: database unreachable");
        HttpResponse::ServiceUnavailable().json(Health {
            success: false,
            status: "degraded",
            database: "down",
        })
    }
}
