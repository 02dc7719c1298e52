//! Access tokens issued by `POST /auth/token`.
//!
//! Tokens are HS256 JWTs whose subject is the user id. Nothing else in the
//! payload is trusted: the role and admin flags are reloaded from the
//! database on every request. There is no refresh token; once a token
//! expires the user repeats the confirmation-code exchange.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use yamdb_core::types::DbId;

/// Lifetime used when `JWT_ACCESS_EXPIRY_MINS` is unset: one day.
pub const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 24 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// Username at issue time, for log correlation only.
    pub username: String,
    pub exp: i64,
    pub iat: i64,
    /// Token id (UUID v4).
    pub jti: String,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS`.
    ///
    /// # Panics
    ///
    /// Panics if the secret is missing or empty, or the expiry is not an
    /// integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    fn ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }
}

/// Sign a token for `user_id`.
pub fn issue_access_token(
    user_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = Utc::now();
    let claims = Claims {
        sub: user_id,
        username: username.to_owned(),
        exp: (issued_at + config.ttl()).timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the claims.
pub fn decode_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(ALGORITHM),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 30,
        }
    }

    #[test]
    fn issued_token_decodes_to_user_id() {
        let config = config("yamdb-unit-test-secret");
        let token = issue_access_token(7, "critic", &config).unwrap();

        let claims = decode_access_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "critic");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn each_token_gets_its_own_id() {
        let config = config("yamdb-unit-test-secret");
        let first = decode_access_token(&issue_access_token(1, "a", &config).unwrap(), &config);
        let second = decode_access_token(&issue_access_token(1, "a", &config).unwrap(), &config);
        assert_ne!(first.unwrap().jti, second.unwrap().jti);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative lifetime, well past the decoder's default leeway.
        let expired = JwtConfig {
            access_token_expiry_mins: -10,
            ..config("yamdb-unit-test-secret")
        };
        let token = issue_access_token(1, "late", &expired).unwrap();
        assert!(decode_access_token(&token, &expired).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = issue_access_token(1, "mallory", &config("one-secret")).unwrap();
        assert!(decode_access_token(&token, &config("other-secret")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_access_token("not.a.jwt", &config("s")).is_err());
    }
}
