//! Transactional order storage used by the checkout services.
//!
//! Services never touch a connection directly. They open a
//! [`StoreTransaction`] from an [`OrderStore`], do their reads and writes
//! through it, and either commit or drop it. Dropping an uncommitted
//! transaction rolls it back.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgStore, PgStoreTransaction};

use crate::entities::orders::{NewOrder, ORDER_PAYLOAD_VERSION, OrderRecord, PaymentSettlement};
use crate::entities::users::UserRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    /// A stored `items`/`address` document could not be decoded.
    #[error("stored order payload is malformed: {0}")]
    MalformedPayload(String),
    #[error("stored order payload has unsupported version {0}")]
    PayloadVersion(i16),
    /// The guarded status transition matched no row.
    #[error("order {0} changed status concurrently")]
    StaleOrder(i64),
    #[error("duplicate value for unique key {0}")]
    Duplicate(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::ColumnDecode { index, source } => {
                StoreError::MalformedPayload(format!("column {index}: {source}"))
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(db.constraint().unwrap_or("unknown").to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Opens units of work against the order store.
#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    type Tx: StoreTransaction;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// One open unit of work.
///
/// Order lookups lock the returned row until the transaction ends, so a
/// status check followed by a write is never interleaved with another
/// transaction's write to the same order.
#[async_trait]
pub trait StoreTransaction: Send + Sized {
    /// Look the user up by uid, inserting it on first contact.
    async fn get_or_create_user(
        &mut self,
        uid: &str,
        phone: Option<&str>,
    ) -> Result<UserRecord, StoreError>;

    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderRecord, StoreError>;

    async fn order_by_gateway_order_id(
        &mut self,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, StoreError>;

    async fn order_by_payment_id(
        &mut self,
        payment_id: &str,
    ) -> Result<Option<OrderRecord>, StoreError>;

    /// `created -> paid`. Fails with [`StoreError::StaleOrder`] if the order
    /// is not `created`.
    async fn mark_paid(
        &mut self,
        order_id: i64,
        settlement: PaymentSettlement,
    ) -> Result<OrderRecord, StoreError>;

    /// `paid -> refunded`. Fails with [`StoreError::StaleOrder`] if the order
    /// is not `paid`.
    async fn mark_refunded(&mut self, order_id: i64) -> Result<(), StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}

/// Reject rows written by a payload format this build does not understand.
pub(crate) fn check_payload_version(order: OrderRecord) -> Result<OrderRecord, StoreError> {
    if order.payload_version != ORDER_PAYLOAD_VERSION {
        return Err(StoreError::PayloadVersion(order.payload_version));
    }
    Ok(order)
}
