use super::{PaymentError, finish};
use crate::config::GatewayConfig;
use crate::entities::OrderStatus;
use crate::store::{OrderStore, StoreTransaction};
use kanau::processor::Processor;
use std::sync::Arc;
use tastycart_sdk::objects::{REFUND_PROCESSED, WebhookEnvelope};
use tastycart_sdk::signature::{self, SignatureError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Applies gateway webhook events to stored orders.
#[derive(Clone)]
pub struct WebhookReconciler<S> {
    store: S,
    gateway_config: Arc<RwLock<GatewayConfig>>,
}

impl<S: OrderStore> WebhookReconciler<S> {
    pub fn new(store: S, gateway_config: Arc<RwLock<GatewayConfig>>) -> Self {
        Self {
            store,
            gateway_config,
        }
    }
}

/// A webhook request exactly as received.
#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    pub body: Vec<u8>,
    /// Value of the signature header, if present.
    pub signature: Option<String>,
}

/// How a verified webhook was handled. Every variant is acknowledged to the
/// gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAck {
    Refunded { order_id: i64 },
    AlreadyRefunded { order_id: i64 },
    /// No order carries the refunded payment id.
    NoMatchingOrder,
    /// The order was never paid.
    NotRefundable { order_id: i64 },
    Unhandled { event: String },
}

impl WebhookAck {
    pub fn message(&self) -> &'static str {
        match self {
            WebhookAck::Unhandled { .. } => "Unhandled event",
            WebhookAck::Refunded { .. }
            | WebhookAck::AlreadyRefunded { .. }
            | WebhookAck::NoMatchingOrder
            | WebhookAck::NotRefundable { .. } => "Webhook handled",
        }
    }
}

impl<S: OrderStore> WebhookReconciler<S> {
    async fn verify(&self, delivery: &WebhookDelivery) -> Result<(), SignatureError> {
        let supplied = delivery
            .signature
            .as_deref()
            .ok_or(SignatureError::Missing)?;
        let config = self.gateway_config.read().await;
        signature::verify_webhook(&delivery.body, supplied, &config.webhook_secret)
    }

    async fn refund(&self, payment_id: &str) -> Result<WebhookAck, PaymentError> {
        let mut tx = self.store.begin().await?;
        let result = refund_in_tx(&mut tx, payment_id).await;
        finish(tx, result).await
    }
}

async fn refund_in_tx<Tx: StoreTransaction>(
    tx: &mut Tx,
    payment_id: &str,
) -> Result<WebhookAck, PaymentError> {
    let Some(order) = tx.order_by_payment_id(payment_id).await? else {
        info!(payment_id, "Refund for unknown payment, ignoring");
        return Ok(WebhookAck::NoMatchingOrder);
    };
    match order.status {
        OrderStatus::Paid => {
            tx.mark_refunded(order.id).await?;
            info!(order_id = order.id, payment_id, "Order refunded");
            Ok(WebhookAck::Refunded { order_id: order.id })
        }
        OrderStatus::Refunded => {
            debug!(order_id = order.id, "Refund replayed, order already refunded");
            Ok(WebhookAck::AlreadyRefunded { order_id: order.id })
        }
        OrderStatus::Created => {
            warn!(order_id = order.id, payment_id, "Refund for unpaid order, ignoring");
            Ok(WebhookAck::NotRefundable { order_id: order.id })
        }
    }
}

impl<S: OrderStore> Processor<WebhookDelivery> for WebhookReconciler<S> {
    type Output = WebhookAck;
    type Error = PaymentError;

    #[tracing::instrument(skip_all, err)]
    async fn process(&self, delivery: WebhookDelivery) -> Result<WebhookAck, PaymentError> {
        if let Err(e) = self.verify(&delivery).await {
            warn!(target: "security", error = %e, "Webhook signature rejected");
            return Err(e.into());
        }

        let envelope: WebhookEnvelope = serde_json::from_slice(&delivery.body)
            .map_err(|e| PaymentError::invalid_field("body", e.to_string()))?;

        if envelope.event != REFUND_PROCESSED {
            debug!(event = %envelope.event, "Ignoring webhook event");
            return Ok(WebhookAck::Unhandled {
                event: envelope.event,
            });
        }

        let Some(refund) = envelope.refund() else {
            return Err(PaymentError::invalid_field(
                "payload.refund.entity",
                "refund entity is required",
            ));
        };
        if refund.payment_id.is_empty() {
            return Err(PaymentError::invalid_field(
                "payload.refund.entity.payment_id",
                "payment id is required",
            ));
        }
        self.refund(&refund.payment_id).await
    }
}
