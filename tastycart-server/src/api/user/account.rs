use axum::{Json, extract::State};
use kanau::processor::Processor;
use tastycart_core::entities::users::GetOrCreateUser;
use tastycart_sdk::objects::storefront::AccountResponse;

use crate::api::error::ApiError;
use crate::api::extractors::Caller;
use crate::state::AppState;

use super::to_account;

/// `POST /api/auth`: the caller's account, created on first sign-in.
pub async fn get_or_create_account(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<AccountResponse>, ApiError> {
    let user = state
        .db()
        .process(GetOrCreateUser {
            uid: caller.uid,
            phone: caller.phone,
        })
        .await?;

    Ok(Json(AccountResponse {
        success: true,
        user: to_account(&user),
    }))
}
