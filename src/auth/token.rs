use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::Config, error::ApiError};

pub const TOKEN_TTL_HOURS: i64 = 4;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(user_id: i32, email: &str, secret: &str) -> anyhow::Result<String> {
    issue_token_at(user_id, email, secret, Utc::now())
}

pub fn issue_token_at(
    user_id: i32,
    email: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<String> {
    let claims = Claims {
        user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("sign token")
}

pub fn validate_token(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// The caller of a protected route, taken from its bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| anyhow!("Config missing from app data"))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(ApiError::unauthorized)?;

    let claims = validate_token(token, &config.jwt_secret).map_err(|err| {
        debug!("rejected token: {}", err);
        ApiError::unauthorized()
    })?;

    Ok(AuthUser {
        user_id: claims.user_id,
        email: claims.email,
    })
}

/// Token of an `Authorization` value; the scheme is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip_keeps_identity() {
        let token = issue_token(7, "ana@x.com", SECRET).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS + 1);
        let token = issue_token_at(7, "ana@x.com", SECRET, issued).unwrap();
        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn bearer_scheme_ignores_case() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("BEARER  abc.def "), Some("abc.def"));
        assert_eq!(bearer_token("Basic abc.def"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), None);
    }

    #[test]
    fn token_is_bound_to_secret() {
        let token = issue_token(7, "ana@x.com", SECRET).unwrap();
        assert!(validate_token(&token, "other-secret").is_err());

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(validate_token(&tampered, SECRET).is_err());
    }
}
