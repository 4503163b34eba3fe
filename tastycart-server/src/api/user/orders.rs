use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;
use tastycart_core::entities::orders::{ListOrderRecordsByUser, OrderRecord};
use tastycart_core::services::PaymentError;
use tastycart_sdk::objects::storefront::OrderDetail;

use crate::api::error::ApiError;
use crate::api::extractors::Caller;
use crate::state::AppState;

use super::ensure_owner;

/// `GET /api/get-orders/{uid}`: the caller's orders, newest first.
pub async fn get_orders(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(uid): Path<String>,
) -> Result<Json<Vec<OrderDetail>>, ApiError> {
    ensure_owner(&caller, &uid)?;

    let records = state
        .db()
        .process(ListOrderRecordsByUser { user_id: uid })
        .await?;
    if records.is_empty() {
        return Err(PaymentError::NotFound("Orders").into());
    }
    Ok(Json(records.into_iter().map(OrderRecord::into_detail).collect()))
}
