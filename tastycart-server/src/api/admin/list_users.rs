use axum::{
    Json,
    extract::{Query, State},
};
use kanau::processor::Processor;
use tastycart_core::entities::users::ListUsers;
use tastycart_core::services::PaymentError;
use tastycart_sdk::objects::admin::{ListQuery, clamp_pagination};
use tastycart_sdk::objects::storefront::AccountDetail;

use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::api::user::to_account;
use crate::state::AppState;

/// `GET /api/auth`: list customer accounts with pagination.
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AccountDetail>>, ApiError> {
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let records = state.db().process(ListUsers { limit, offset }).await?;
    if records.is_empty() {
        return Err(PaymentError::NotFound("Users").into());
    }
    Ok(Json(records.iter().map(to_account).collect()))
}
