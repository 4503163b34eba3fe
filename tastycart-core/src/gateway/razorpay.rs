use super::{GatewayError, PaymentGateway, RemoteOrderRequest};
use crate::config::GatewayConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tastycart_sdk::objects::GatewayOrder;
use tastycart_sdk::signature::{self, SignatureError};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Longest error body kept from a rejected gateway call.
const MAX_ERROR_BODY: usize = 512;

/// Razorpay Orders API client.
///
/// Credentials are read from the shared config on every call, so a reload
/// takes effect without rebuilding the client.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    config: Arc<RwLock<GatewayConfig>>,
}

impl RazorpayClient {
    pub fn new(config: Arc<RwLock<GatewayConfig>>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    #[tracing::instrument(skip_all, err, fields(receipt = %request.receipt, amount = request.amount))]
    async fn create_remote_order(
        &self,
        request: RemoteOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let (url, key_id, key_secret) = {
            let config = self.config.read().await;
            (
                config.api_base.join("orders")?,
                config.key_id.clone(),
                config.key_secret.clone(),
            )
        };

        let response = self
            .http
            .post(url)
            .basic_auth(key_id, Some(key_secret))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let order: GatewayOrder = response.json().await?;
        debug!(gateway_order_id = %order.id, "Created remote order");
        Ok(order)
    }

    async fn verify_payment_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        let config = self.config.read().await;
        signature::verify_payment(
            gateway_order_id,
            payment_id,
            signature,
            config.key_secret.as_bytes(),
        )
        .inspect_err(|e| {
            warn!(
                target: "security",
                gateway_order_id,
                payment_id,
                error = %e,
                "Payment signature rejected"
            );
        })
    }
}
