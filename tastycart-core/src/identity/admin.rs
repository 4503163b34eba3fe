//! Admin session tokens.

use super::IdentityError;
use crate::config::AdminConfig;
use crate::entities::admins::AdminRecord;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin row id.
    pub id: i64,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl AdminClaims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Issue a session token for an admin that passed the password check.
pub fn issue_admin_token(admin: &AdminRecord, config: &AdminConfig) -> Result<String, IdentityError> {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let claims = AdminClaims {
        id: admin.id,
        username: admin.username.clone(),
        role: ADMIN_ROLE.to_string(),
        iat: now,
        exp: now + config.token_ttl.as_secs() as i64,
    };
    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&config.jwt_secret),
    )?)
}

/// Check the signature and expiry of an admin session token.
///
/// The role is not checked here; see [`AdminClaims::is_admin`].
pub fn verify_admin_token(token: &str, config: &AdminConfig) -> Result<AdminClaims, IdentityError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(&config.jwt_secret),
        &validation,
    )?;
    Ok(data.claims)
}
