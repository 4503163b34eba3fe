//! Caller identity.
//!
//! Customers authenticate with a Firebase ID token; admins with a short-lived
//! HS256 session token issued by [`admin::issue_admin_token`].

pub mod admin;
mod firebase;

pub use firebase::FirebaseVerifier;

use async_trait::async_trait;
use thiserror::Error;

/// A verified customer identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("authorization header missing")]
    MissingToken,
    #[error("invalid authorization format")]
    MalformedHeader,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token signed by unknown key {0:?}")]
    UnknownKey(Option<String>),
    #[error("token has no subject")]
    MissingSubject,
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(#[from] reqwest::Error),
    #[error("invalid username or password")]
    InvalidCredentials,
}

impl IdentityError {
    /// Short reason safe to show to the caller.
    pub fn public_reason(&self) -> &'static str {
        use jsonwebtoken::errors::ErrorKind;
        match self {
            IdentityError::MissingToken => "Authorization header missing",
            IdentityError::MalformedHeader => "Invalid authorization format",
            IdentityError::InvalidToken(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                "Token expired - please login again"
            }
            IdentityError::InvalidCredentials => "Invalid username or password",
            IdentityError::InvalidToken(_)
            | IdentityError::UnknownKey(_)
            | IdentityError::MissingSubject
            | IdentityError::KeyFetch(_) => "Authentication failed",
        }
    }
}

/// Verifies a customer bearer token.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<CallerIdentity, IdentityError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, IdentityError> {
    let header = header.ok_or(IdentityError::MissingToken)?;
    match header.split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(IdentityError::MalformedHeader),
    }
}
