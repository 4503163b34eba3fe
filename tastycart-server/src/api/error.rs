//! HTTP rendering of [`PaymentError`].
//!
//! Every handler returns `Result<_, ApiError>`. Bodies have the shape
//! `{ "success": false, "error": "...", "errors": [...]?, "details": "..."? }`.
//!
//! `details` is added by [`expose_error_details`], and only while the
//! configured environment is development.

use crate::state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tastycart_core::identity::IdentityError;
use tastycart_core::services::{FieldError, PaymentError};
use tastycart_core::store::StoreError;

/// Internal error text carried on a 5xx response until
/// [`expose_error_details`] decides whether the caller may see it.
#[derive(Debug, Clone)]
struct ErrorDetails(String);

#[derive(Debug)]
pub struct ApiError(pub PaymentError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PaymentError::Validation(_) => StatusCode::BAD_REQUEST,
            PaymentError::Auth(_) => StatusCode::UNAUTHORIZED,
            PaymentError::Authorization => StatusCode::FORBIDDEN,
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::Conflict(_) => StatusCode::BAD_REQUEST,
            PaymentError::Signature(_) => StatusCode::BAD_REQUEST,
            PaymentError::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorBody {
            success: false,
            error: String::new(),
            errors: None,
            details: None,
        };
        match self.0 {
            PaymentError::Validation(fields) => {
                body.error = "Validation failed".into();
                body.errors = Some(fields);
            }
            PaymentError::Auth(e) => {
                tracing::debug!(error = %e, "Authentication rejected");
                body.error = e.public_reason().into();
            }
            PaymentError::Authorization => {
                body.error = "Access denied".into();
            }
            PaymentError::NotFound(what) => {
                body.error = format!("{what} not found");
            }
            PaymentError::Conflict(message) => {
                body.error = message.into();
            }
            PaymentError::Signature(_) => {
                body.error = "Invalid signature".into();
            }
            e @ (PaymentError::Dependency(_) | PaymentError::Internal(_)) => {
                tracing::error!(error = %e, "Request failed");
                body.error = "Internal server error".into();
                let mut response = (status, Json(body)).into_response();
                response.extensions_mut().insert(ErrorDetails(e.to_string()));
                return response;
            }
        }
        (status, Json(body)).into_response()
    }
}

/// Response layer that adds `details` to internal error bodies when the
/// server runs in the development environment. Reads the live config, so a
/// reload takes effect on the next request.
pub async fn expose_error_details(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(ErrorDetails(details)) = response.extensions_mut().remove::<ErrorDetails>() else {
        return response;
    };
    if !state.config.server.read().await.environment.is_development() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer error body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let mut value: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };
    if let Some(object) = value.as_object_mut() {
        object.insert("details".into(), details.into());
    }
    parts.headers.remove(header::CONTENT_LENGTH);
    let body = serde_json::to_vec(&value)
        .map(Body::from)
        .unwrap_or_else(|_| Body::from(bytes));
    Response::from_parts(parts, body)
}

impl From<PaymentError> for ApiError {
    fn from(value: PaymentError) -> Self {
        ApiError(value)
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError(value.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(value: sqlx::Error) -> Self {
        ApiError(StoreError::from(value).into())
    }
}

impl From<IdentityError> for ApiError {
    fn from(value: IdentityError) -> Self {
        ApiError(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tastycart_sdk::signature::SignatureError;

    async fn render(err: PaymentError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                PaymentError::invalid_field("amount", "too small"),
                StatusCode::BAD_REQUEST,
            ),
            (
                PaymentError::Auth(IdentityError::MissingToken),
                StatusCode::UNAUTHORIZED,
            ),
            (PaymentError::Authorization, StatusCode::FORBIDDEN),
            (PaymentError::NotFound("Order"), StatusCode::NOT_FOUND),
            (
                PaymentError::Conflict("Payment already processed"),
                StatusCode::BAD_REQUEST,
            ),
            (
                PaymentError::Signature(SignatureError::SignatureMismatch),
                StatusCode::BAD_REQUEST,
            ),
            (
                PaymentError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StoreError::StaleOrder(1).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let (status, body) = render(PaymentError::invalid_field("amount", "too small")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "amount");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_body_has_no_details() {
        let (_, body) = render(PaymentError::Internal("payload version 9".into())).await;
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_internal_error_carries_details_for_the_layer() {
        let response = ApiError(PaymentError::Internal("payload version 9".into())).into_response();
        let details = response.extensions().get::<ErrorDetails>().unwrap();
        assert_eq!(details.0, "internal error: payload version 9");

        let response = ApiError(PaymentError::NotFound("Order")).into_response();
        assert!(response.extensions().get::<ErrorDetails>().is_none());
    }

    #[tokio::test]
    async fn test_auth_error_uses_public_reason() {
        let (status, body) = render(PaymentError::Auth(IdentityError::MalformedHeader)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid authorization format");
    }
}
