use axum::Json;
use tastycart_sdk::objects::storefront::MessageResponse;

use crate::api::extractors::AdminAuth;

/// `GET /admin/dashboard`
pub async fn dashboard(AdminAuth(claims): AdminAuth) -> Json<MessageResponse> {
    tracing::debug!(username = %claims.username, "Dashboard opened");
    Json(MessageResponse::new("Welcome to the admin dashboard"))
}
