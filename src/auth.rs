//! Signed staff sessions for the admin endpoints.
//!
//! A session is an HS256 token carrying the staff member's id and role. It is
//! read from `Authorization: Bearer <token>` or, for browser sessions, from the
//! `admin_session` cookie.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;

pub const ADMIN_ROLE: &str = "admin";
pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session has expired")]
    Expired,
    #[error("Invalid session token: {0}")]
    Invalid(String),
    #[error("Failed to sign session token: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff member id.
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, subject: &str, role: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid(e.to_string()),
            })
    }
}

/// Extractor that admits only verified sessions with the admin role.
///
/// Missing, malformed or expired sessions yield 401; a valid session with any
/// other role yields 403.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub claims: Claims,
}

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

fn authorize(req: &HttpRequest) -> Result<AdminSession, AppError> {
    let keys = req
        .app_data::<web::Data<SessionKeys>>()
        .ok_or_else(|| AppError::Internal("session keys are not configured".to_string()))?;

    let token = session_token(req).ok_or(AppError::Unauthorized)?;
    let claims = keys.verify(&token).map_err(|e| {
        log::debug!("Rejected admin session: {}", e);
        AppError::Unauthorized
    })?;

    if claims.role != ADMIN_ROLE {
        log::warn!(
            "Session for {} with role '{}' denied admin access to {}",
            claims.sub,
            claims.role,
            req.path()
        );
        return Err(AppError::Forbidden);
    }

    Ok(AdminSession { claims })
}
