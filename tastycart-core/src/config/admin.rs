//! Admin configuration.

use std::time::Duration;

/// Default lifetime of an admin session token.
pub const DEFAULT_ADMIN_TOKEN_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Admin session token settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// HS256 key for admin session tokens.
    pub jwt_secret: Box<[u8]>,
    pub token_ttl: Duration,
}

impl AdminConfig {
    pub fn new(jwt_secret: impl Into<Box<[u8]>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: DEFAULT_ADMIN_TOKEN_TTL,
        }
    }
}
