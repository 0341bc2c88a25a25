use std::str::FromStr;

use chrono::Duration;

use crate::error::Error;

/// Credentials for the account created on first start.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_max_connections: u32,
    pub db_migrate: bool,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub production: bool,
    pub admin: Option<AdminSeed>,
}

fn parse<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, Error> {
    match raw {
        Some(v) if !v.is_empty() => v.parse().map_err(|_| Error::ConfigError(format!("{} has an invalid value: {}", key, v))),
        _ => Ok(default),
    }
}

fn flag(raw: Option<String>) -> bool {
    matches!(raw.as_deref(), Some("1" | "true" | "yes"))
}

impl Config {
    /// Reads the process environment after `.env` has been loaded.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_owned());
        let jwt_secret = get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::ConfigError("JWT_SECRET must be set".into()))?;
        let admin = match (get("ADMIN_USERNAME"), get("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => Some(AdminSeed {
                email: get("ADMIN_EMAIL").unwrap_or_else(|| format!("{}@localhost.localdomain", username)),
                username,
                password,
            }),
            _ => None,
        };
        Ok(Self {
            host: text("HOST", "0.0.0.0"),
            port: parse("PORT", get("PORT"), 5000)?,
            db_host: text("DB_HOST", "localhost"),
            db_port: parse("DB_PORT", get("DB_PORT"), 3306)?,
            db_user: text("DB_USER", "root"),
            db_password: text("DB_PASSWORD", ""),
            db_name: text("DB_NAME", "sitecms"),
            db_max_connections: parse("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 10)?,
            db_migrate: flag(get("DB_MIGRATE")),
            jwt_secret,
            jwt_ttl: Duration::hours(parse("JWT_TTL_HOURS", get("JWT_TTL_HOURS"), 24)?),
            production: get("APP_ENV").as_deref() == Some("production"),
            admin,
        })
    }
}
