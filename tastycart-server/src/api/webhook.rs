//! Gateway webhook receiver.
//!
//! The body is taken as raw bytes: the signature covers the exact bytes the
//! gateway sent, so it must be checked before any JSON parsing.

use axum::{body::Bytes, extract::State, http::HeaderMap};
use kanau::processor::Processor;
use tastycart_core::services::WebhookDelivery;
use tastycart_sdk::signature::WEBHOOK_SIGNATURE_HEADER;

use crate::api::error::ApiError;
use crate::state::AppState;

/// `POST /webhook`: apply a signed gateway event.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let ack = state
        .reconciler
        .process(WebhookDelivery {
            body: body.to_vec(),
            signature,
        })
        .await?;
    tracing::debug!(?ack, "Webhook acknowledged");
    Ok(ack.message())
}
