use chrono::{Duration, Utc};
use hex::ToHex;
use rand::{thread_rng, Rng};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::core::{
    models::user::{self, Profile},
    ports::{
        repository::{TxStore, UserCommon},
        tokener::Tokener,
    },
    services::resource::create_record,
};
use crate::error::Error;
use crate::impls::tokener::jwt::Claim;

const SALT_CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn random_salt() -> String {
    let mut rng = thread_rng();
    (0..32).map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char).collect()
}

fn digest(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

/// Stored form is `salt$hex(sha256(password + salt))`.
pub fn hash_password(pass: &str) -> String {
    let slt = random_salt();
    format!("{}${}", slt, digest(pass, &slt))
}

pub fn verify_password(pass: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((slt, hash)) => digest(pass, slt) == hash,
        None => false,
    }
}

/// Checks a username-or-email / password pair and issues a token for an active user.
pub async fn login<S, T>(store: &mut S, tokener: &T, login: &str, password: &str, ttl: Duration) -> Result<(String, Profile), Error>
where
    S: UserCommon,
    T: Tokener<Claim>,
{
    let creds = match store.get_credentials(login).await? {
        Some(creds) if verify_password(password, &creds.password) => creds,
        _ => {
            log::warn!("failed login for {}", login);
            return Err(Error::Unauthorized);
        }
    };
    if creds.status != "active" {
        log::warn!("login refused for inactive user {}", creds.id);
        return Err(Error::Unauthorized);
    }
    let claim = Claim {
        user: creds.id.to_string(),
        role: creds.role.clone(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    let token = tokener.gen_token(&claim)?;
    store.touch_login(creds.id).await?;
    log::info!("user {} logged in", creds.id);
    Ok((token, Profile::from(creds)))
}

/// Creates the first admin account when the users table is still empty.
pub async fn bootstrap_admin<T>(mut tx: T, username: &str, email: &str, password: &str) -> Result<Option<i64>, Error>
where
    T: TxStore,
{
    if tx.count_users().await? > 0 {
        tx.rollback().await?;
        return Ok(None);
    }
    let mut payload = Map::new();
    payload.insert("username".into(), Value::from(username));
    payload.insert("email".into(), Value::from(email));
    payload.insert("password".into(), Value::from(password));
    payload.insert("role".into(), Value::from(user::ROLE_ADMIN));
    let id = create_record(&mut tx, &user::SCHEMA, &payload).await?;
    tx.commit().await?;
    log::info!("bootstrapped admin user {} ({})", username, id);
    Ok(Some(id))
}
