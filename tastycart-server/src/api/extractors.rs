//! Custom Axum extractors for request authentication and validation.
//!
//! Provides:
//! - `Caller`: a customer verified from the `Authorization: Bearer` Firebase
//!   ID token.
//! - `AdminAuth`: an admin session token carrying the `admin` role.
//! - `ValidatedJson<T>`: a JSON body that passed its `validator` rules.
//!
//! Rejections are [`ApiError`]s so they render like every other failure.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::de::DeserializeOwned;
use tastycart_core::identity::admin::{AdminClaims, verify_admin_token};
use tastycart_core::identity::{CallerIdentity, IdentityError, bearer_token};
use tastycart_core::services::PaymentError;
use validator::Validate;

use crate::api::error::ApiError;
use crate::state::AppState;

fn authorization_token(parts: &Parts) -> Result<&str, IdentityError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| IdentityError::MalformedHeader))
        .transpose()?;
    bearer_token(header)
}

// ---------------------------------------------------------------------------
// Caller: customer authentication via Firebase ID token
// ---------------------------------------------------------------------------

/// The verified customer making the request.
pub struct Caller(pub CallerIdentity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = authorization_token(parts)?;
        let identity = state.identity.verify(token).await?;
        Ok(Caller(identity))
    }
}

// ---------------------------------------------------------------------------
// AdminAuth: admin panel authentication via session token
// ---------------------------------------------------------------------------

/// Claims of a valid admin session.
pub struct AdminAuth(pub AdminClaims);

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = authorization_token(parts)?;
        let admin = state.config.admin.read().await;
        let claims = verify_admin_token(token, &admin)?;
        drop(admin);

        if !claims.is_admin() {
            tracing::warn!(
                target: "security",
                username = %claims.username,
                role = %claims.role,
                "Admin route accessed without admin role"
            );
            return Err(PaymentError::Authorization.into());
        }
        Ok(AdminAuth(claims))
    }
}

// ---------------------------------------------------------------------------
// ValidatedJson: JSON body checked against its validator rules
// ---------------------------------------------------------------------------

/// A JSON request body that deserialized and validated.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| PaymentError::invalid_field("body", rejection.body_text()))?;
        value.validate().map_err(|e| PaymentError::validation(&e))?;
        Ok(ValidatedJson(value))
    }
}
