use axum::{
    Json,
    extract::{Query, State},
};
use kanau::processor::Processor;
use tastycart_core::entities::orders::{ListOrderRecords, OrderRecord};
use tastycart_core::services::PaymentError;
use tastycart_sdk::objects::admin::{ListOrdersQuery, clamp_pagination};
use tastycart_sdk::objects::storefront::OrderDetail;

use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// `GET /api/get-orders/allorders`: list orders with pagination and an
/// optional status filter.
pub async fn list_orders(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderDetail>>, ApiError> {
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let records = state
        .db()
        .process(ListOrderRecords {
            limit,
            offset,
            status: query.status.map(Into::into),
        })
        .await?;
    if records.is_empty() {
        return Err(PaymentError::NotFound("Orders").into());
    }
    Ok(Json(records.into_iter().map(OrderRecord::into_detail).collect()))
}
