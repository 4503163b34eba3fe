pub mod admins;
pub mod addresses;
pub mod coupons;
pub mod feedback;
pub mod orders;
pub mod users;

use tastycart_sdk::objects::OrderStatus as SdkOrderStatus;

/// Order status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `tastycart_sdk::objects::OrderStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "order_status")]
pub enum OrderStatus {
    Created,
    Paid,
    Refunded,
}

impl From<OrderStatus> for SdkOrderStatus {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Created => SdkOrderStatus::Created,
            OrderStatus::Paid => SdkOrderStatus::Paid,
            OrderStatus::Refunded => SdkOrderStatus::Refunded,
        }
    }
}

impl From<SdkOrderStatus> for OrderStatus {
    fn from(value: SdkOrderStatus) -> Self {
        match value {
            SdkOrderStatus::Created => OrderStatus::Created,
            SdkOrderStatus::Paid => OrderStatus::Paid,
            SdkOrderStatus::Refunded => OrderStatus::Refunded,
        }
    }
}

/// Current UTC time as stored in `timestamp` columns.
pub fn now_utc() -> time::PrimitiveDateTime {
    let now = time::OffsetDateTime::now_utc();
    time::PrimitiveDateTime::new(now.date(), now.time())
}

/// Unix timestamp of a stored UTC `timestamp` value.
pub fn unix_timestamp(value: time::PrimitiveDateTime) -> i64 {
    value.assume_utc().unix_timestamp()
}
