use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 12 * 60 * 60;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_seconds: i64,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("session secret is empty")]
    MissingSecret,
    #[error("session token has expired")]
    Expired,
    #[error("session token is invalid: {0}")]
    Invalid(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(err.to_string()),
        }
    }
}

/// Signs an HS256 bearer token for `subject`.
pub fn mint_session_token(cfg: &SessionConfig, subject: &str) -> Result<String, TokenError> {
    if cfg.secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    let now = Utc::now();
    let claims = SessionClaims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(cfg.ttl_seconds)).timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_session_token(secret: &str, token: &str) -> Result<SessionClaims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    if data.claims.sub.trim().is_empty() {
        return Err(TokenError::Invalid("empty subject".into()));
    }
    Ok(data.claims)
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
