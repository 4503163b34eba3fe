//! Storefront account, address, coupon, feedback and order-history types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::checkout::{AddressEntry, LineItem, OrderStatus, UserSummary};

/// Response of the get-or-create account endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub success: bool,
    pub user: AccountDetail,
}

/// Full account row as shown to its owner and to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetail {
    pub id: i64,
    pub uid: String,
    pub phone: Option<String>,
    pub created_at: i64,
}

impl From<&AccountDetail> for UserSummary {
    fn from(value: &AccountDetail) -> Self {
        UserSummary {
            uid: value.uid.clone(),
            phone: value.phone.clone(),
        }
    }
}

/// Saved address submitted from the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub house_details: Option<String>,
    #[serde(default)]
    pub area_details: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[validate(length(min = 1, message = "Pincode is required"))]
    pub pincode: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Must be a valid email"))]
    pub email: Option<String>,
}

/// Whether an address submission inserted or replaced the saved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressAction {
    Create,
    Update,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSubmitResponse {
    pub success: bool,
    pub message: String,
    pub action: AddressAction,
    pub address_id: i64,
}

/// Saved address as returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: i64,
    pub uid: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub house_details: Option<String>,
    pub area_details: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CouponApplyRequest {
    #[validate(length(min = 1, message = "Coupon code is required"))]
    pub coupon_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponApplyResponse {
    pub valid: bool,
    pub discount: i32,
    pub coupon_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub rating: Option<i16>,
    pub created_at: i64,
}

/// Full order row as shown in order history and the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub gateway_order_id: String,
    pub user_id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,
    pub address: Vec<AddressEntry>,
    pub gateway_payment_id: Option<String>,
    pub paid_at: Option<i64>,
    pub created_at: i64,
}

/// Plain `{ "message": ... }` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_request_requires_name_and_pincode() {
        let req: AddressRequest = serde_json::from_value(json!({
            "firstName": "",
            "pincode": "",
            "email": "bad"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("pincode"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_feedback_rating_bounds() {
        let mut req = FeedbackRequest {
            full_name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: None,
            message: "Loved the cookies".into(),
            rating: Some(5),
        };
        assert!(req.validate().is_ok());
        req.rating = Some(9);
        assert!(req.validate().is_err());
    }
}
