//! Checkout endpoints: order creation and payment verification.

use axum::{Json, extract::State, http::StatusCode};
use kanau::processor::Processor;
use tastycart_core::services::{CreateOrder, VerifyPayment};
use tastycart_sdk::objects::{
    CreateOrderRequest, CreateOrderResponse, UserSummary, VerifyPaymentRequest,
    VerifyPaymentResponse,
};

use crate::api::error::ApiError;
use crate::api::extractors::{Caller, ValidatedJson};
use crate::state::AppState;

/// `POST /api/create-order`: open a gateway order for the caller.
pub async fn create_order(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), ApiError> {
    let created = state
        .lifecycle
        .process(CreateOrder { request, caller })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            success: true,
            order: created.gateway_order,
            user: UserSummary {
                uid: created.user.uid,
                phone: created.user.phone,
            },
        }),
    ))
}

/// `POST /api/verify-payment`: settle an order from the checkout widget's
/// signed payment confirmation.
pub async fn verify_payment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ValidatedJson(request): ValidatedJson<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let order = state
        .verifier
        .process(VerifyPayment { request, caller })
        .await?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully".into(),
        order: order.summary(),
    }))
}
