#![allow(async_fn_in_trait)]

mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
mod request;
mod response;
mod routes;

use actix_web::{
    http::StatusCode,
    middleware::{Condition, ErrorHandlers, Logger},
    web::Data,
    App, HttpServer,
};
use anyhow::Context;

use crate::config::Config;
use crate::core::ports::repository::Manager;
use crate::core::services::auth::bootstrap_admin;
use crate::database::mysql::MySqlxManager;
use crate::handlers::Auth;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("failed to load configuration")?;

    let manager = MySqlxManager::connect(&config).await.context("failed to connect to database")?;
    if config.db_migrate {
        sqlx::migrate!("./migrations").run(manager.pool()).await?;
        log::info!("migrations applied");
    }
    if let Some(seed) = &config.admin {
        bootstrap_admin(manager.tx().await?, &seed.username, &seed.email, &seed.password).await?;
    }

    let secret = config.jwt_secret.clone().into_bytes();
    let ttl = config.jwt_ttl;
    let server_manager = manager.clone();
    let production = config.production;
    log::info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(production, ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, error::mask_internal)))
            .wrap(Logger::default())
            .app_data(Data::new(server_manager.clone()))
            .app_data(Data::new(Auth::new(&secret, ttl)))
            .configure(routes::configure::<MySqlxManager>(secret.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    manager.pool().close().await;
    Ok(())
}
