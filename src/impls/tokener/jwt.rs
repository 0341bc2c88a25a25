use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub struct JWT {
    secret: Vec<u8>,
}

impl JWT {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<P> Tokener<P> for JWT
where
    P: Payload,
{
    fn gen_token(&self, payload: &P) -> Result<String, Error> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(&self.secret);
        let token = encode(&header, payload, &key)?;
        Ok(token)
    }
    fn verify_token(&self, token: &str) -> Result<P, Error> {
        let key = DecodingKey::from_secret(&self.secret);
        let validation = Validation::new(Algorithm::HS256);
        let payload = decode(token, &key, &validation)?;
        Ok(payload.claims)
    }
}

/// Claims carried by an admin console token.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub role: String,
    pub exp: i64,
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, Utc};

    fn claim(user: &str, exp: i64) -> Claim {
        Claim {
            user: user.into(),
            role: "editor".into(),
            exp,
        }
    }

    #[test]
    fn test_gen_and_verify_token() {
        let jwt = JWT::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let c = claim("42", (Utc::now() + Duration::hours(1)).timestamp());
        let token = jwt.gen_token(&c).unwrap();
        let verified: Claim = jwt.verify_token(&token).unwrap();
        assert_eq!(verified.user, "42");
        assert_eq!(verified.role, "editor");
    }

    #[test]
    fn test_different_tokens() {
        let jwt = JWT::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token_a = jwt.gen_token(&claim("a", exp)).unwrap();
        let token_b = jwt.gen_token(&claim("b", exp)).unwrap();
        assert_ne!(token_a, token_b);
        let c_a: Claim = jwt.verify_token(&token_a).unwrap();
        let c_b: Claim = jwt.verify_token(&token_b).unwrap();
        assert_eq!(c_a.user(), "a");
        assert_eq!(c_b.user(), "b");
    }

    #[test]
    fn test_rejects_foreign_and_expired_tokens() {
        let jwt = JWT::new(b"one secret".to_vec());
        let other = JWT::new(b"another secret".to_vec());
        let token = other.gen_token(&claim("1", (Utc::now() + Duration::hours(1)).timestamp())).unwrap();
        assert!(<JWT as Tokener<Claim>>::verify_token(&jwt, &token).is_err());
        let expired = jwt.gen_token(&claim("1", (Utc::now() - Duration::hours(2)).timestamp())).unwrap();
        assert!(<JWT as Tokener<Claim>>::verify_token(&jwt, &expired).is_err());
    }
}
