//! Checkout services: order creation, payment verification and webhook
//! reconciliation.
//!
//! Each service is a [`Processor`](kanau::processor::Processor) over a
//! command type and reports failures as a [`PaymentError`].

mod order_lifecycle;
mod payment_verifier;
mod webhook_reconciler;

#[cfg(test)]
mod testing;

pub use order_lifecycle::{CreateOrder, CreatedOrder, OrderLifecycleManager};
pub use payment_verifier::{PaymentVerifier, VerifyPayment};
pub use webhook_reconciler::{WebhookAck, WebhookDelivery, WebhookReconciler};

use crate::gateway::GatewayError;
use crate::identity::IdentityError;
use crate::store::{StoreError, StoreTransaction};
use serde::Serialize;
use std::borrow::Cow;
use tastycart_sdk::signature::SignatureError;
use thiserror::Error;
use tracing::warn;
use validator::{ValidationErrors, ValidationErrorsKind};

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path, with list indices in brackets: `address[0].email`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flatten nested validator output into one entry per failed rule,
    /// sorted by field path.
    pub fn from_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
        let mut out = Vec::new();
        collect_field_errors("", errors, &mut out);
        out.sort_by(|a, b| a.field.cmp(&b.field));
        out
    }
}

fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .clone()
                        .unwrap_or_else(|| Cow::Owned(format!("invalid value ({})", error.code)));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

/// A collaborator the services depend on failed.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("store: {0}")]
    Store(StoreError),
    #[error("payment gateway: {0}")]
    Gateway(#[from] GatewayError),
}

/// Every way a checkout operation can fail.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("authentication failed: {0}")]
    Auth(#[from] IdentityError),
    #[error("caller is not allowed to access this resource")]
    Authorization,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("invalid signature: {0}")]
    Signature(#[from] SignatureError),
    #[error("dependency failure: {0}")]
    Dependency(#[from] DependencyError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    pub fn validation(errors: &ValidationErrors) -> Self {
        PaymentError::Validation(FieldError::from_validation_errors(errors))
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        PaymentError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<StoreError> for PaymentError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::MalformedPayload(_) | StoreError::PayloadVersion(_) => {
                PaymentError::Internal(value.to_string())
            }
            other => PaymentError::Dependency(DependencyError::Store(other)),
        }
    }
}

impl From<GatewayError> for PaymentError {
    fn from(value: GatewayError) -> Self {
        PaymentError::Dependency(DependencyError::Gateway(value))
    }
}

/// Commit on success, roll back on failure.
///
/// A rollback failure is logged; the original error is returned.
pub(crate) async fn finish<Tx: StoreTransaction, T>(
    tx: Tx,
    result: Result<T, PaymentError>,
) -> Result<T, PaymentError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(error = %rollback, "Failed to roll back transaction");
            }
            Err(e)
        }
    }
}
