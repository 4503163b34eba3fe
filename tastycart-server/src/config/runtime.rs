//! Runtime configuration re-exports.
//!
//! The actual config types are defined in `tastycart-core::config`.
//! This module re-exports them for convenience.

pub use tastycart_core::config::{
    AdminConfig, DEFAULT_GATEWAY_API_BASE, GatewayConfig, IdentityConfig, MailConfig,
    ServerConfig, SharedConfig,
};
