//! Outbound mail configuration.

use url::Url;

#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    /// HTTP mail API endpoint. Without one, notifications are only logged.
    pub endpoint: Option<Url>,
    pub api_key: Option<String>,
    /// Sender address.
    pub from: String,
}
