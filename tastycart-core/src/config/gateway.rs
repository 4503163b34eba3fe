//! Payment gateway configuration.

use url::Url;

/// Default Razorpay REST endpoint.
pub const DEFAULT_GATEWAY_API_BASE: &str = "https://api.razorpay.com/v1/";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Public key id, used as the basic-auth user.
    pub key_id: String,
    /// Key secret. Basic-auth password and the key for payment signatures.
    pub key_secret: String,
    /// Secret shared with the gateway for webhook bodies.
    pub webhook_secret: Box<[u8]>,
    pub api_base: Url,
}
