//! Caller identity
//!
//! Upload and read endpoints take a bearer credential from the `Authorization`
//! header and resolve it to a user id through an [`IdentityVerifier`].

pub mod jwt;

pub use jwt::{AccessClaims, JwtVerifier, ACCESS_TOKEN_ISSUER};

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use tubely_core::AppError;
use uuid::Uuid;

/// Resolves a bearer credential to the id of the calling user.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Fails with `AppError::Unauthorized` when the credential is invalid.
    async fn resolve(&self, credential: &str) -> Result<Uuid, AppError>;
}

/// Extract the bearer token from `headers`, if present and well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
