//! Admin API handlers.
//!
//! Login is public; everything else requires an admin session token from
//! `POST /admin/login` as `Authorization: Bearer <token>`.
//!
//! # Endpoints
//!
//! - `POST /admin/login`                – exchange username/password for a token
//! - `GET  /admin/dashboard`            – role check for the dashboard shell
//! - `GET  /api/auth`                   – list customer accounts (paginated)
//! - `GET  /api/get-orders/allorders`   – list orders (paginated, filterable)
//! - `GET  /api/feedback`               – list feedback (paginated)
//!
//! Listings answer `404` when the page is empty.

pub(crate) mod dashboard;
pub(crate) mod list_feedback;
pub(crate) mod list_orders;
pub(crate) mod list_users;
pub(crate) mod login;
