use super::{PaymentError, finish};
use crate::entities::OrderStatus;
use crate::entities::now_utc;
use crate::entities::orders::{OrderRecord, PaymentSettlement};
use crate::gateway::PaymentGateway;
use crate::identity::CallerIdentity;
use crate::notify::{Notification, Notifier, send_best_effort};
use crate::store::{OrderStore, StoreError, StoreTransaction};
use kanau::processor::Processor;
use std::sync::Arc;
use tastycart_sdk::objects::VerifyPaymentRequest;
use tracing::{info, warn};
use validator::Validate;

/// Settles `created` orders once the gateway-signed payment confirmation
/// checks out.
#[derive(Clone)]
pub struct PaymentVerifier<S> {
    store: S,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
}

impl<S: OrderStore> PaymentVerifier<S> {
    pub fn new(store: S, gateway: Arc<dyn PaymentGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            gateway,
            notifier,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerifyPayment {
    pub request: VerifyPaymentRequest,
    pub caller: CallerIdentity,
}

async fn settle_in_tx<Tx: StoreTransaction>(
    tx: &mut Tx,
    request: &VerifyPaymentRequest,
    caller: &CallerIdentity,
) -> Result<OrderRecord, PaymentError> {
    let order = tx
        .order_by_gateway_order_id(&request.order_id)
        .await?
        .ok_or(PaymentError::NotFound("Order"))?;

    if order.user_id != caller.uid {
        warn!(
            target: "security",
            order_id = order.id,
            uid = %caller.uid,
            "Payment verification attempted by non-owner"
        );
        return Err(PaymentError::Authorization);
    }

    match order.status {
        OrderStatus::Created => {}
        OrderStatus::Paid | OrderStatus::Refunded => {
            return Err(PaymentError::Conflict("Payment already processed"));
        }
    }

    let settlement = PaymentSettlement {
        payment_id: request.payment_id.clone(),
        signature: request.signature.clone(),
        paid_at: now_utc(),
    };
    match tx.mark_paid(order.id, settlement).await {
        Ok(paid) => Ok(paid),
        Err(StoreError::StaleOrder(_)) => Err(PaymentError::Conflict(
            "Payment already processed",
        )),
        Err(StoreError::Duplicate(_)) => Err(PaymentError::Conflict(
            "Payment already recorded against another order",
        )),
        Err(e) => Err(e.into()),
    }
}

/// Confirmation mail for a freshly paid order.
fn confirmation(order: &OrderRecord) -> Notification {
    let address = order.primary_address();
    let shipping = address.and_then(|a| {
        let parts: Vec<&str> = [
            a.house_details.as_deref(),
            a.area_details.as_deref(),
            a.landmark.as_deref(),
            a.city.as_deref(),
            a.state.as_deref(),
            a.pincode.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    });
    Notification::OrderConfirmed {
        order_id: order.id,
        gateway_order_id: order.gateway_order_id.clone(),
        amount: order.amount,
        currency: order.currency.clone(),
        recipient_name: address.and_then(|a| a.recipient_name()),
        shipping,
    }
}

impl<S: OrderStore> Processor<VerifyPayment> for PaymentVerifier<S> {
    type Output = OrderRecord;
    type Error = PaymentError;

    #[tracing::instrument(skip_all, err, fields(gateway_order_id = %cmd.request.order_id, payment_id = %cmd.request.payment_id))]
    async fn process(&self, cmd: VerifyPayment) -> Result<OrderRecord, PaymentError> {
        cmd.request.validate().map_err(|e| PaymentError::validation(&e))?;

        let VerifyPaymentRequest {
            order_id,
            payment_id,
            signature,
        } = &cmd.request;
        self.gateway
            .verify_payment_signature(order_id, payment_id, signature)
            .await?;

        let mut tx = self.store.begin().await?;
        let result = settle_in_tx(&mut tx, &cmd.request, &cmd.caller).await;
        let order = finish(tx, result).await?;
        info!(order_id = order.id, "Payment verified");

        match order.contact_email() {
            Some(email) => send_best_effort(self.notifier.as_ref(), email, &confirmation(&order)).await,
            None => warn!(order_id = order.id, "Paid order has no contact email"),
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{
        FakeGateway, RecordingNotifier, caller, order_request, payment_signature,
    };
    use crate::services::{CreateOrder, OrderLifecycleManager};
    use crate::store::MemoryStore;
    use tastycart_sdk::signature::SignatureError;

    struct Fixture {
        store: MemoryStore,
        verifier: PaymentVerifier<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        gateway_order_id: String,
    }

    async fn fixture(notifier: RecordingNotifier) -> Fixture {
        let store = MemoryStore::new();
        let gateway: Arc<FakeGateway> = Arc::new(FakeGateway::default());
        let notifier = Arc::new(notifier);
        let created = OrderLifecycleManager::new(store.clone(), gateway.clone())
            .process(CreateOrder {
                request: order_request(),
                caller: caller("U1"),
            })
            .await
            .unwrap();
        Fixture {
            verifier: PaymentVerifier::new(store.clone(), gateway, notifier.clone()),
            store,
            notifier,
            gateway_order_id: created.gateway_order.id,
        }
    }

    fn verify(order_id: &str, payment_id: &str, signature: String, uid: &str) -> VerifyPayment {
        VerifyPayment {
            request: VerifyPaymentRequest {
                order_id: order_id.into(),
                payment_id: payment_id.into(),
                signature,
            },
            caller: caller(uid),
        }
    }

    #[tokio::test]
    async fn test_second_verification_is_duplicate() {
        let f = fixture(RecordingNotifier::default()).await;
        let sig = payment_signature(&f.gateway_order_id, "pay_1");

        let paid = f
            .verifier
            .process(verify(&f.gateway_order_id, "pay_1", sig.clone(), "U1"))
            .await
            .unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.gateway_payment_id.as_deref(), Some("pay_1"));
        assert!(paid.paid_at.is_some());
        let after_first = f.store.orders().await;

        let err = f
            .verifier
            .process(verify(&f.gateway_order_id, "pay_1", sig, "U1"))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Conflict("Payment already processed")));
        assert_eq!(f.store.orders().await, after_first);
        assert_eq!(f.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_signature_changes_nothing() {
        let f = fixture(RecordingNotifier::default()).await;
        let before = f.store.orders().await;
        let opened = f.store.transactions_opened();

        for sig in [
            payment_signature(&f.gateway_order_id, "pay_2"),
            payment_signature("order_other", "pay_1"),
            "zz".to_string(),
        ] {
            let err = f
                .verifier
                .process(verify(&f.gateway_order_id, "pay_1", sig, "U1"))
                .await
                .unwrap_err();
            assert!(matches!(err, PaymentError::Signature(_)));
        }
        assert_eq!(f.store.orders().await, before);
        assert_eq!(f.store.transactions_opened(), opened);
        assert!(f.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_is_rejected() {
        let f = fixture(RecordingNotifier::default()).await;
        let before = f.store.orders().await;
        let sig = payment_signature(&f.gateway_order_id, "pay_1");

        let err = f
            .verifier
            .process(verify(&f.gateway_order_id, "pay_1", sig, "U2"))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Authorization));
        assert_eq!(f.store.orders().await, before);
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let f = fixture(RecordingNotifier::default()).await;
        let sig = payment_signature("order_missing", "pay_1");
        let err = f
            .verifier
            .process(verify("order_missing", "pay_1", sig, "U1"))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_fields_fail_validation() {
        let f = fixture(RecordingNotifier::default()).await;
        let err = f
            .verifier
            .process(verify("", "pay_1", String::new(), "U1"))
            .await
            .unwrap_err();
        let PaymentError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["order_id", "signature"]);
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_payment() {
        let f = fixture(RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        })
        .await;
        let sig = payment_signature(&f.gateway_order_id, "pay_1");
        let paid = f
            .verifier
            .process(verify(&f.gateway_order_id, "pay_1", sig, "U1"))
            .await
            .unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);

        let sent = f.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a@b.com");
        let Notification::OrderConfirmed {
            recipient_name,
            shipping,
            ..
        } = &sent[0].1
        else {
            panic!("expected order confirmation");
        };
        assert_eq!(recipient_name.as_deref(), Some("Asha"));
        assert_eq!(shipping.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_signature_error_maps_to_signature_variant() {
        let err: PaymentError = SignatureError::SignatureMismatch.into();
        assert!(matches!(err, PaymentError::Signature(_)));
    }
}
