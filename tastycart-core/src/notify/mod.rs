//! Customer notifications.
//!
//! Delivery is best-effort: callers go through [`send_best_effort`], which
//! logs failures instead of returning them.

mod mailer;

pub use mailer::HttpMailer;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    OrderConfirmed {
        order_id: i64,
        gateway_order_id: String,
        amount: i64,
        currency: String,
        recipient_name: Option<String>,
        /// Single-line shipping address, when one was given.
        shipping: Option<String>,
    },
    FeedbackReceived {
        full_name: String,
    },
}

impl Notification {
    pub fn subject(&self) -> &'static str {
        match self {
            Notification::OrderConfirmed { .. } => "Thank you for your order!",
            Notification::FeedbackReceived { .. } => "Thank You for Your Feedback!",
        }
    }

    /// Plain-text body.
    pub fn body(&self) -> String {
        match self {
            Notification::OrderConfirmed {
                gateway_order_id,
                amount,
                currency,
                recipient_name,
                shipping,
                ..
            } => {
                let greeting = recipient_name.as_deref().unwrap_or("there");
                let mut body = format!(
                    "Hi {greeting},\n\nWe received your payment for order {gateway_order_id} \
                     ({} {currency}).",
                    format_minor_units(*amount)
                );
                if let Some(shipping) = shipping {
                    body.push_str(&format!("\nIt will be shipped to: {shipping}"));
                }
                body
            }
            Notification::FeedbackReceived { full_name } => format!(
                "Thank you, {full_name}!\n\nWe're grateful for your feedback. \
                 It helps us bake better."
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Notification::OrderConfirmed { .. } => "order_confirmed",
            Notification::FeedbackReceived { .. } => "feedback_received",
        }
    }
}

/// `50000` minor units as `500.00`.
fn format_minor_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("mail API rejected the message with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that only records the message in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            to,
            kind = notification.kind(),
            subject = notification.subject(),
            "Notification (log only)"
        );
        Ok(())
    }
}

/// Send a notification, logging and discarding any failure.
pub async fn send_best_effort(notifier: &dyn Notifier, to: &str, notification: &Notification) {
    if let Err(e) = notifier.send(to, notification).await {
        warn!(
            to,
            kind = notification.kind(),
            error = %e,
            "Failed to send notification"
        );
    }
}
