use axum::{Json, extract::State};
use kanau::processor::Processor;
use tastycart_core::entities::admins::GetAdminByUsername;
use tastycart_core::identity::IdentityError;
use tastycart_core::identity::admin::issue_admin_token;
use tastycart_core::services::PaymentError;
use tastycart_sdk::objects::admin::{AdminLoginRequest, AdminLoginResponse};

use crate::api::error::ApiError;
use crate::api::extractors::ValidatedJson;
use crate::state::AppState;

/// `POST /admin/login`: check the password and issue a session token.
///
/// Unknown usernames, wrong passwords and non-admin rows all get the same
/// `401` answer.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let admin = state
        .db()
        .process(GetAdminByUsername {
            username: request.username,
        })
        .await?;

    let admin = match admin {
        Some(admin) if admin.is_admin && admin.verify_password(&request.password) => admin,
        _ => {
            tracing::warn!(target: "security", "Failed admin login");
            return Err(IdentityError::InvalidCredentials.into());
        }
    };

    let token = {
        let config = state.config.admin.read().await;
        issue_admin_token(&admin, &config)
            .map_err(|e| PaymentError::Internal(format!("failed to issue admin token: {e}")))?
    };
    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin logged in");

    Ok(Json(AdminLoginResponse {
        message: "Login successful".into(),
        token,
    }))
}
