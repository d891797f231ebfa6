//! Authentication: identities, bearer tokens and password hashing.
//!
//! A caller is authenticated either by a session established through GitHub
//! login or by a bearer token issued from `GET /auth/token`. The identity
//! middleware resolves one of the two into an [`Identity`]; write routes demand
//! it through the [`AuthenticatedUser`] extractor.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::oauth::GithubUser;

/// Token issuer claim.
pub const TOKEN_ISSUER: &str = "edusync-api";

/// JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// GitHub user id (subject).
    pub sub: String,
    /// GitHub login.
    pub login: String,
    /// Display name at issue time.
    pub name: String,
    pub iss: String,
    /// Expiration time (unix timestamp).
    pub exp: usize,
    /// Issued at (unix timestamp).
    pub iat: usize,
}

/// How the caller proved who they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    Session,
    BearerToken,
}

/// Identity resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub github_id: String,
    pub login: String,
    pub display_name: String,
    pub source: AuthSource,
}

impl Identity {
    pub fn from_session_user(user: &GithubUser) -> Self {
        Self {
            github_id: user.id.to_string(),
            login: user.login.clone(),
            display_name: user.display_name().to_string(),
            source: AuthSource::Session,
        }
    }

    pub fn from_claims(claims: Claims) -> Self {
        Self {
            github_id: claims.sub,
            login: claims.login,
            display_name: claims.name,
            source: AuthSource::BearerToken,
        }
    }
}

/// Extractor that rejects requests without an identity (401).
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "Log in with GitHub or send Authorization: Bearer <token>".to_string(),
                )
            })
    }
}

/// Create a bearer token for an identity.
pub fn create_token(
    identity: &Identity,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, ApiError> {
    let now = chrono::Utc::now();
    let exp = i64::try_from(expiry_hours)
        .ok()
        .and_then(chrono::Duration::try_hours)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            ApiError::Internal(format!("Token expiry of {expiry_hours} hours is out of range"))
        })?
        .timestamp() as usize;

    let claims = Claims {
        sub: identity.github_id.clone(),
        login: identity.login.clone(),
        name: identity.display_name.clone(),
        iss: TOKEN_ISSUER.to_string(),
        exp,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to create token: {}", e)))
}

/// Validate a bearer token and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[TOKEN_ISSUER]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(password_hash.to_string())
}
