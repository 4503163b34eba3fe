//! Payment gateway collaborator.
//!
//! The services only see [`PaymentGateway`]; the Razorpay REST client is one
//! implementation of it and is injected as `Arc<dyn PaymentGateway>`.

mod razorpay;

pub use razorpay::RazorpayClient;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use tastycart_sdk::objects::GatewayOrder;
use tastycart_sdk::signature::SignatureError;
use thiserror::Error;

/// Body of a remote order creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    /// Free-form key/value pairs stored on the gateway side.
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gateway rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("invalid gateway endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create the remote order a checkout widget pays against.
    async fn create_remote_order(
        &self,
        request: RemoteOrderRequest,
    ) -> Result<GatewayOrder, GatewayError>;

    /// Check the signature the checkout widget returned for a payment.
    async fn verify_payment_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), SignatureError>;
}
