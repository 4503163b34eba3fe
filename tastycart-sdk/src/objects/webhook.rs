//! Payment gateway webhook payload types.

use serde::{Deserialize, Serialize};

/// Event type emitted once a refund has been settled by the gateway.
pub const REFUND_PROCESSED: &str = "refund.processed";

/// Envelope common to every gateway webhook.
///
/// Only the sections this backend acts on are typed. Other events carry
/// payloads of different shapes and are accepted as long as the envelope
/// itself parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub refund: Option<EntityWrapper<RefundEntity>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

/// Refund entity as delivered inside `payload.refund.entity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundEntity {
    pub id: String,
    pub payment_id: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl WebhookEnvelope {
    /// The refund entity, if this event carries one.
    pub fn refund(&self) -> Option<&RefundEntity> {
        self.payload.refund.as_ref().map(|r| &r.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_refund_processed() {
        let raw = r#"{
            "entity": "event",
            "account_id": "acc_BFQ7uQEaa7j2z7",
            "event": "refund.processed",
            "contains": ["refund", "payment"],
            "payload": {
                "refund": {"entity": {
                    "id": "rfnd_1",
                    "entity": "refund",
                    "amount": 500,
                    "currency": "INR",
                    "payment_id": "pay_1",
                    "status": "processed"
                }},
                "payment": {"entity": {"id": "pay_1", "amount": 500}}
            },
            "created_at": 1567674606
        }"#;
        let envelope: WebhookEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.event, REFUND_PROCESSED);
        let refund = envelope.refund().unwrap();
        assert_eq!(refund.payment_id, "pay_1");
        assert_eq!(refund.amount, Some(500));
    }

    #[test]
    fn test_other_events_parse_without_refund() {
        let raw = r#"{"event": "payment.captured", "payload": {"payment": {"entity": {"id": "pay_1"}}}}"#;
        let envelope: WebhookEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.event, "payment.captured");
        assert!(envelope.refund().is_none());
    }
}
