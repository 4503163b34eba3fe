use axum::{
    Json,
    extract::{Query, State},
};
use kanau::processor::Processor;
use tastycart_core::entities::feedback::ListFeedback;
use tastycart_core::services::PaymentError;
use tastycart_sdk::objects::admin::{ListQuery, clamp_pagination};
use tastycart_sdk::objects::storefront::FeedbackResponse;

use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::api::user::to_feedback;
use crate::state::AppState;

/// `GET /api/feedback`: list feedback, newest first.
pub async fn list_feedback(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FeedbackResponse>>, ApiError> {
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let records = state.db().process(ListFeedback { limit, offset }).await?;
    if records.is_empty() {
        return Err(PaymentError::NotFound("Feedback").into());
    }
    Ok(Json(records.into_iter().map(to_feedback).collect()))
}
