//! TOML file configuration structures.
//!
//! These structs directly map to the `tastycart.toml` file format.

use serde::Deserialize;
use std::net::SocketAddr;
use tastycart_core::config::Environment;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub gateway: GatewayConfig,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    #[serde(default)]
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            environment: Environment::default(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Admin configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// HS256 key for admin session tokens.
    pub jwt_secret: String,
    /// Session lifetime in seconds. Two hours when unset.
    #[serde(default)]
    pub token_ttl_secs: Option<u64>,
}

/// Razorpay credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    #[serde(default)]
    pub api_base: Option<Url>,
}

/// Firebase project the customer tokens are issued for.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub project_id: String,
}

/// Outbound mail API. Leave `endpoint` unset to only log notifications.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub endpoint: Option<Url>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub from: String,
}
