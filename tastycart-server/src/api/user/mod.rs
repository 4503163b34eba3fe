//! Storefront API handlers.
//!
//! Account, saved address and order-history endpoints require the
//! customer's Firebase ID token as `Authorization: Bearer <token>`; the
//! uid in the path must be the caller's own. Coupon and feedback
//! submission are public.
//!
//! # Endpoints
//!
//! - `POST /api/auth`                – get or create the caller's account
//! - `POST /api/address`             – save the caller's shipping address
//! - `GET  /api/get-address/{uid}`   – the caller's saved address
//! - `GET  /api/get-orders/{uid}`    – the caller's orders
//! - `POST /api/coupon/apply`        – check a coupon code
//! - `POST /api/feedback`            – submit feedback

use tastycart_core::entities::addresses::AddressRecord;
use tastycart_core::entities::feedback::FeedbackRecord;
use tastycart_core::entities::unix_timestamp;
use tastycart_core::entities::users::UserRecord;
use tastycart_core::identity::CallerIdentity;
use tastycart_core::services::PaymentError;
use tastycart_sdk::objects::storefront::{AccountDetail, AddressResponse, FeedbackResponse};

pub(crate) mod account;
pub(crate) mod address;
pub(crate) mod coupon;
pub(crate) mod feedback;
pub(crate) mod orders;

/// Reject access to another customer's resources.
fn ensure_owner(caller: &CallerIdentity, uid: &str) -> Result<(), PaymentError> {
    if caller.uid != uid {
        tracing::warn!(
            target: "security",
            caller = %caller.uid,
            requested = %uid,
            "Access to another customer's data denied"
        );
        return Err(PaymentError::Authorization);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub(crate) fn to_account(record: &UserRecord) -> AccountDetail {
    AccountDetail {
        id: record.id,
        uid: record.uid.clone(),
        phone: record.phone.clone(),
        created_at: unix_timestamp(record.created_at),
    }
}

fn to_address(record: AddressRecord) -> AddressResponse {
    AddressResponse {
        id: record.id,
        uid: record.uid,
        first_name: record.first_name,
        last_name: record.last_name,
        house_details: record.house_details,
        area_details: record.area_details,
        landmark: record.landmark,
        city: record.city,
        state: record.state,
        pincode: record.pincode,
        phone: record.phone,
        email: record.email,
    }
}

pub(crate) fn to_feedback(record: FeedbackRecord) -> FeedbackResponse {
    FeedbackResponse {
        id: record.id,
        full_name: record.full_name,
        email: record.email,
        phone: record.phone,
        message: record.message,
        rating: record.rating,
        created_at: unix_timestamp(record.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(uid: &str) -> CallerIdentity {
        CallerIdentity {
            uid: uid.into(),
            phone: None,
            email: None,
            email_verified: false,
        }
    }

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(&caller("U1"), "U1").is_ok());
        assert!(matches!(
            ensure_owner(&caller("U1"), "U2"),
            Err(PaymentError::Authorization)
        ));
    }

    #[test]
    fn test_account_timestamp_is_unix() {
        let record = UserRecord {
            id: 3,
            uid: "U1".into(),
            phone: Some("+910000000000".into()),
            created_at: time::macros::datetime!(2024-01-01 00:00:00),
        };
        let account = to_account(&record);
        assert_eq!(account.created_at, 1_704_067_200);
        assert_eq!(account.uid, "U1");
    }
}
