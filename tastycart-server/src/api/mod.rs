//! HTTP API.
//!
//! Storefront and admin endpoints share the `/api` prefix (and in places the
//! same path with different methods), so the whole tree is assembled here.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod admin;
pub mod checkout;
pub mod error;
pub mod extractors;
pub mod user;
pub mod webhook;

/// Routes mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(checkout::create_order))
        .route("/verify-payment", post(checkout::verify_payment))
        .route(
            "/auth",
            post(user::account::get_or_create_account).get(admin::list_users::list_users),
        )
        .route("/address", post(user::address::save_address))
        .route("/get-address/{uid}", get(user::address::get_address))
        .route(
            "/get-orders/allorders",
            get(admin::list_orders::list_orders),
        )
        .route("/get-orders/{uid}", get(user::orders::get_orders))
        .route("/coupon/apply", post(user::coupon::apply_coupon))
        .route(
            "/feedback",
            post(user::feedback::submit_feedback).get(admin::list_feedback::list_feedback),
        )
}

/// Routes mounted under `/admin`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login::login))
        .route("/dashboard", get(admin::dashboard::dashboard))
}
