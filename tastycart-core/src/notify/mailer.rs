use super::{LogNotifier, Notification, Notifier, NotifyError};
use crate::config::MailConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Serialize)]
struct MailMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Posts notifications as JSON to an HTTP mail API.
///
/// The config is read on every send, so a reload can add or remove the
/// endpoint. Without one, messages go to [`LogNotifier`].
#[derive(Clone)]
pub struct HttpMailer {
    http: reqwest::Client,
    config: Arc<RwLock<MailConfig>>,
}

impl HttpMailer {
    pub fn new(config: Arc<RwLock<MailConfig>>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError> {
        let config = self.config.read().await.clone();
        let Some(endpoint) = config.endpoint else {
            return LogNotifier.send(to, notification).await;
        };

        let message = MailMessage {
            from: &config.from,
            to,
            subject: notification.subject(),
            text: notification.body(),
        };
        let mut request = self.http.post(endpoint).json(&message);
        if let Some(key) = &config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        debug!(to, subject = message.subject, "Notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_endpoint_only_logs() {
        let mailer = HttpMailer::new(Arc::new(RwLock::new(MailConfig::default())));
        let n = Notification::FeedbackReceived {
            full_name: "Asha".into(),
        };
        assert!(mailer.send("a@b.com", &n).await.is_ok());
    }
}
