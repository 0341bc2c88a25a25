use actix_web::{
    web::{delete, get, patch, post, put, scope, Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig},
    HttpResponse, Scope,
};

use crate::core::models::{application, blog, contact, job, schema::ResourceSchema, service, team};
use crate::core::ports::repository::Manager;
use crate::error::Error;
use crate::handlers::{self, admin, public, public::PublicResource};
use crate::middlewares::jwt::JWTMiddleware;

const JSON_LIMIT: usize = 1 << 20;

fn json_config() -> JsonConfig {
    JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _| Error::ValidationError(format!("invalid JSON body: {}", err)).into())
}

fn query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, _| Error::ValidationError(format!("invalid query string: {}", err)).into())
}

fn path_config() -> PathConfig {
    PathConfig::default().error_handler(|err, _| Error::ValidationError(format!("invalid path: {}", err)).into())
}

async fn route_not_found() -> Result<HttpResponse, Error> {
    Err(Error::NotFound("route".into()))
}

fn public_scope(schema: &'static ResourceSchema) -> Scope {
    scope(&format!("/{}", schema.name)).app_data(Data::new(PublicResource(schema)))
}

/// Mounts every endpoint under `/api`. The manager and `handlers::Auth` are app data set by the caller.
pub fn configure<M>(secret: Vec<u8>) -> impl FnOnce(&mut ServiceConfig)
where
    M: Manager + 'static,
{
    move |cfg| {
        cfg.app_data(json_config()).app_data(query_config()).app_data(path_config()).service(
            scope("/api")
                .route("/health", get().to(handlers::health::<M>))
                .service(
                    public_scope(&blog::SCHEMA)
                        .route("", get().to(public::list::<M>))
                        .route("/{urlTitle}", get().to(public::detail::<M>)),
                )
                .service(
                    public_scope(&job::SCHEMA)
                        .route("", get().to(public::list::<M>))
                        .route("/{id}", get().to(public::detail::<M>)),
                )
                .service(
                    public_scope(&service::SCHEMA)
                        .route("", get().to(public::list::<M>))
                        .route("/{slug}", get().to(public::detail::<M>)),
                )
                .service(public_scope(&team::SCHEMA).route("", get().to(public::list::<M>)))
                .service(public_scope(&application::SCHEMA).route("", post().to(public::submit::<M>)))
                .service(public_scope(&contact::SCHEMA).route("", post().to(public::submit::<M>)))
                .service(
                    scope("/admin").route("/login", post().to(handlers::login::<M>)).service(
                        scope("")
                            .wrap(JWTMiddleware::new(secret))
                            .route("/me", get().to(handlers::me::<M>))
                            .route("/dashboard", get().to(admin::dashboard::<M>))
                            .route("/schema", get().to(admin::schemas))
                            .route("/schema/{resource}", get().to(admin::schema))
                            .route("/{resource}", get().to(admin::list::<M>))
                            .route("/{resource}", post().to(admin::create::<M>))
                            .route("/{resource}/{id}", get().to(admin::detail::<M>))
                            .route("/{resource}/{id}", put().to(admin::update::<M>))
                            .route("/{resource}/{id}", delete().to(admin::delete::<M>))
                            .route("/{resource}/{id}/status", patch().to(admin::update_status::<M>)),
                    ),
                )
                .default_service(actix_web::web::to(route_not_found)),
        );
    }
}
