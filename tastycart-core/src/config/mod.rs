//! Configuration types for tastycart.
//!
//! These types represent the validated runtime configuration shared between
//! the services and the HTTP layer. Loading and parsing the config file is
//! handled by the server crate.

mod admin;
mod gateway;
mod identity;
mod mail;
mod server;

pub use admin::{AdminConfig, DEFAULT_ADMIN_TOKEN_TTL};
pub use gateway::{DEFAULT_GATEWAY_API_BASE, GatewayConfig};
pub use identity::IdentityConfig;
pub use mail::MailConfig;
pub use server::{Environment, ServerConfig};

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared configuration state with separate locks for each section.
///
/// Each section can be swapped on reload without blocking readers of the
/// others.
#[derive(Clone)]
pub struct SharedConfig {
    /// Listen address and deployment environment.
    pub server: Arc<RwLock<ServerConfig>>,
    /// Admin session token signing.
    pub admin: Arc<RwLock<AdminConfig>>,
    /// Payment gateway credentials.
    pub gateway: Arc<RwLock<GatewayConfig>>,
    /// Customer identity provider.
    pub identity: Arc<RwLock<IdentityConfig>>,
    /// Outbound mail API.
    pub mail: Arc<RwLock<MailConfig>>,
}

impl SharedConfig {
    pub fn new(
        server: ServerConfig,
        admin: AdminConfig,
        gateway: GatewayConfig,
        identity: IdentityConfig,
        mail: MailConfig,
    ) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            admin: Arc::new(RwLock::new(admin)),
            gateway: Arc::new(RwLock::new(gateway)),
            identity: Arc::new(RwLock::new(identity)),
            mail: Arc::new(RwLock::new(mail)),
        }
    }
}
