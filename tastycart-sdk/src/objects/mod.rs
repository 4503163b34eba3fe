pub mod admin;
pub mod checkout;
pub mod storefront;
pub mod webhook;

pub use checkout::{
    AddressEntry, CreateOrderRequest, CreateOrderResponse, GatewayOrder, LineItem, OrderStatus,
    OrderSummary, UserSummary, VerifyPaymentRequest, VerifyPaymentResponse,
};
pub use webhook::{REFUND_PROCESSED, RefundEntity, WebhookEnvelope};
