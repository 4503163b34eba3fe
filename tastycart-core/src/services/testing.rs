//! Collaborator doubles shared by the service tests.

use crate::gateway::{GatewayError, PaymentGateway, RemoteOrderRequest};
use crate::identity::CallerIdentity;
use crate::notify::{Notification, Notifier, NotifyError};
use async_trait::async_trait;
use serde_json::{Map, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tastycart_sdk::objects::{CreateOrderRequest, GatewayOrder};
use tastycart_sdk::signature::{self, SignatureError};

pub const KEY_SECRET: &[u8] = b"test-key-secret";
pub const WEBHOOK_SECRET: &[u8] = b"test-webhook-secret";

/// Gateway that hands out sequential order ids and checks signatures with
/// [`KEY_SECRET`].
#[derive(Default)]
pub struct FakeGateway {
    next_id: AtomicU64,
    pub fail: bool,
    /// Hand out this id on every call instead of a fresh one.
    pub fixed_id: Option<String>,
    pub requests: Mutex<Vec<RemoteOrderRequest>>,
}

impl FakeGateway {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_fixed_id(id: &str) -> Self {
        Self {
            fixed_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_remote_order(
        &self,
        request: RemoteOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(GatewayError::Rejected {
                status: 502,
                body: "gateway down".into(),
            });
        }
        let id = match &self.fixed_id {
            Some(id) => id.clone(),
            None => format!("order_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
        };
        Ok(GatewayOrder {
            id,
            amount: request.amount,
            currency: request.currency,
            receipt: Some(request.receipt),
            status: "created".into(),
            extra: Map::new(),
        })
    }

    async fn verify_payment_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        signature::verify_payment(gateway_order_id, payment_id, signature, KEY_SECRET)
    }
}

/// Notifier that remembers what it was asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<(String, Notification)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, Notification)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), notification.clone()));
        if self.fail {
            return Err(NotifyError::Rejected(503));
        }
        Ok(())
    }
}

pub fn caller(uid: &str) -> CallerIdentity {
    CallerIdentity {
        uid: uid.to_string(),
        phone: Some("+919999999999".into()),
        email: None,
        email_verified: false,
    }
}

/// The order used throughout the checkout scenario.
pub fn order_request() -> CreateOrderRequest {
    serde_json::from_value(json!({
        "amount": 500,
        "currency": "INR",
        "receipt": "R1",
        "items": [{"sku": "A", "qty": 1}],
        "address": [{"email": "a@b.com", "firstName": "Asha", "city": "Pune"}],
    }))
    .unwrap()
}

pub fn payment_signature(gateway_order_id: &str, payment_id: &str) -> String {
    signature::sign_payment(gateway_order_id, payment_id, KEY_SECRET)
}
