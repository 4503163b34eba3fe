use axum::{Json, extract::State};
use kanau::processor::Processor;
use tastycart_core::entities::feedback::InsertFeedback;
use tastycart_core::notify::{Notification, send_best_effort};
use tastycart_sdk::objects::storefront::{FeedbackRequest, MessageResponse};

use crate::api::error::ApiError;
use crate::api::extractors::ValidatedJson;
use crate::state::AppState;

/// `POST /api/feedback`: store customer feedback and send a thank-you mail.
pub async fn submit_feedback(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<FeedbackRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let record = state
        .db()
        .process(InsertFeedback {
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            message: request.message,
            rating: request.rating,
        })
        .await?;
    tracing::info!(feedback_id = record.id, "Feedback received");

    let thanks = Notification::FeedbackReceived {
        full_name: record.full_name.clone(),
    };
    send_best_effort(state.notifier.as_ref(), &record.email, &thanks).await;

    Ok(Json(MessageResponse::new("Feedback submitted")))
}
