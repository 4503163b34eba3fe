//! Checkout request and response types.
//!
//! Sent by the storefront frontend on behalf of a signed-in customer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Currency used when the request omits one.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Smallest accepted order amount, in the currency's minor unit.
pub const MIN_ORDER_AMOUNT: i64 = 100;

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Request payload for creating a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Amount in the smallest currency unit (paise for INR).
    #[validate(range(min = 100, message = "Amount must be at least 1 unit of currency"))]
    pub amount: i64,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3, message = "Currency must be 3 characters"))]
    pub currency: String,
    #[validate(length(min = 1, message = "Receipt ID is required"))]
    pub receipt: String,
    #[validate(
        length(min = 1, message = "Items must be an array with at least one item"),
        nested
    )]
    pub items: Vec<LineItem>,
    #[validate(
        length(min = 1, message = "At least one address entry is required"),
        nested
    )]
    pub address: Vec<AddressEntry>,
}

/// A single line item of an order.
///
/// The storefront decides what an item looks like, so every known key is
/// optional. Unknown keys are kept in `extra` so nothing is lost between the
/// writer and later readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Item quantity must be at least 1"))]
    pub qty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price in the smallest currency unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A shipping address entry attached to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressEntry {
    #[validate(email(message = "Must provide a valid email in address"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddressEntry {
    /// Full recipient name, if any part of it is present.
    pub fn recipient_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A remote order as returned by the payment gateway.
///
/// Only the fields the backend reads are typed; the rest is passed through
/// to the frontend untouched since the checkout widget consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Public view of a customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub uid: String,
    pub phone: Option<String>,
}

/// Response returned after creating an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order: GatewayOrder,
    pub user: UserSummary,
}

/// Request payload sent after the checkout widget reports a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
    /// Gateway order reference returned by create-order.
    #[validate(length(min = 1, message = "Order ID is required"))]
    pub order_id: String,
    #[validate(length(min = 1, message = "Payment ID is required"))]
    pub payment_id: String,
    #[validate(length(min = 1, message = "Signature is required"))]
    pub signature: String,
}

/// Order status for API responses.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `tastycart-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
    Refunded,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Created => write!(f, "created"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// Compact order view returned after payment verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i64,
    pub amount: i64,
    pub currency: String,
    pub status: OrderStatus,
    /// Unix timestamp of settlement.
    pub paid_at: Option<i64>,
}

/// Response returned after a successful payment verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub order: OrderSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> CreateOrderRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_currency_defaults_to_inr() {
        let req = request(json!({
            "amount": 500,
            "receipt": "R1",
            "items": [{"sku": "A", "qty": 1}],
            "address": [{"email": "a@b.com"}],
        }));
        assert_eq!(req.currency, "INR");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validation_reports_each_bad_field() {
        let req = request(json!({
            "amount": 99,
            "currency": "RUPEE",
            "receipt": "",
            "items": [],
            "address": [{"email": "not-an-email"}],
        }));
        let errors = req.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("amount"));
        assert!(fields.contains_key("currency"));
        assert!(fields.contains_key("receipt"));
        assert!(fields.contains_key("items"));
        assert!(fields.contains_key("address"));
    }

    #[test]
    fn test_items_accept_storefront_shapes() {
        let req = request(json!({
            "amount": 500,
            "receipt": "R1",
            "items": [{"id": 12, "name": "Margherita", "quantity": 2}],
            "address": [{"email": "a@b.com"}],
        }));
        assert!(req.validate().is_ok());
        let item = &req.items[0];
        assert_eq!(item.sku, None);
        assert_eq!(item.qty, None);
        assert_eq!(item.name.as_deref(), Some("Margherita"));
        assert_eq!(item.extra.get("quantity"), Some(&json!(2)));

        let back = serde_json::to_value(item).unwrap();
        assert_eq!(back, json!({"id": 12, "name": "Margherita", "quantity": 2}));
    }

    #[test]
    fn test_item_quantity_checked_when_present() {
        let req = request(json!({
            "amount": 500,
            "receipt": "R1",
            "items": [{"sku": "A", "qty": 0}],
            "address": [{"email": "a@b.com"}],
        }));
        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("items"));
    }

    #[test]
    fn test_address_keeps_unknown_fields() {
        let entry: AddressEntry = serde_json::from_value(json!({
            "email": "a@b.com",
            "firstName": "Asha",
            "lastName": "Rao",
            "deliveryNote": "ring twice",
        }))
        .unwrap();
        assert_eq!(entry.recipient_name().as_deref(), Some("Asha Rao"));
        assert_eq!(entry.extra.get("deliveryNote"), Some(&json!("ring twice")));

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["firstName"], json!("Asha"));
        assert_eq!(back["deliveryNote"], json!("ring twice"));
    }

    #[test]
    fn test_gateway_order_passes_through_extra_fields() {
        let order: GatewayOrder = serde_json::from_value(json!({
            "id": "order_9A33XWu170gUtm",
            "entity": "order",
            "amount": 500,
            "amount_paid": 0,
            "amount_due": 500,
            "currency": "INR",
            "receipt": "R1",
            "status": "created",
            "attempts": 0,
            "notes": [],
            "created_at": 1566986570
        }))
        .unwrap();
        assert_eq!(order.id, "order_9A33XWu170gUtm");
        assert_eq!(order.extra.get("amount_due"), Some(&json!(500)));
    }
}
