use super::{OrderStore, StoreError, StoreTransaction, check_payload_version};
use crate::entities::orders::{NewOrder, OrderRecord, PaymentSettlement};
use crate::entities::users::UserRecord;
use crate::framework::{DatabaseProcessor, TransactionProcessor};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL-backed [`OrderStore`].
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseProcessor,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            db: DatabaseProcessor { pool },
        }
    }
}

pub struct PgStoreTransaction {
    inner: TransactionProcessor<'static>,
}

#[async_trait]
impl OrderStore for PgStore {
    type Tx = PgStoreTransaction;

    async fn begin(&self) -> Result<PgStoreTransaction, StoreError> {
        Ok(PgStoreTransaction {
            inner: self.db.begin().await?,
        })
    }
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    #[tracing::instrument(skip_all, err, name = "SQL:GetOrCreateUserTx")]
    async fn get_or_create_user(
        &mut self,
        uid: &str,
        phone: Option<&str>,
    ) -> Result<UserRecord, StoreError> {
        // The second attempt sees a row committed by a racing insert.
        for _ in 0..2 {
            if let Some(user) = UserRecord::insert_or_fetch(&mut *self.inner.tx, uid, phone).await? {
                return Ok(user);
            }
        }
        Err(sqlx::Error::RowNotFound.into())
    }

    #[tracing::instrument(skip_all, err, name = "SQL:InsertOrderTx")]
    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderRecord, StoreError> {
        let record = OrderRecord::insert(&mut *self.inner.tx, &order).await?;
        Ok(record)
    }

    #[tracing::instrument(skip_all, err, name = "SQL:LockOrderByGatewayIdTx")]
    async fn order_by_gateway_order_id(
        &mut self,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, StoreError> {
        OrderRecord::lock_by_gateway_order_id(&mut *self.inner.tx, gateway_order_id)
            .await?
            .map(check_payload_version)
            .transpose()
    }

    #[tracing::instrument(skip_all, err, name = "SQL:LockOrderByPaymentIdTx")]
    async fn order_by_payment_id(
        &mut self,
        payment_id: &str,
    ) -> Result<Option<OrderRecord>, StoreError> {
        OrderRecord::lock_by_payment_id(&mut *self.inner.tx, payment_id)
            .await?
            .map(check_payload_version)
            .transpose()
    }

    #[tracing::instrument(skip_all, err, name = "SQL:MarkOrderPaidTx")]
    async fn mark_paid(
        &mut self,
        order_id: i64,
        settlement: PaymentSettlement,
    ) -> Result<OrderRecord, StoreError> {
        OrderRecord::mark_paid(&mut *self.inner.tx, order_id, &settlement)
            .await?
            .ok_or(StoreError::StaleOrder(order_id))
    }

    #[tracing::instrument(skip_all, err, name = "SQL:MarkOrderRefundedTx")]
    async fn mark_refunded(&mut self, order_id: i64) -> Result<(), StoreError> {
        match OrderRecord::mark_refunded(&mut *self.inner.tx, order_id).await? {
            0 => Err(StoreError::StaleOrder(order_id)),
            _ => Ok(()),
        }
    }

    async fn commit(self) -> Result<(), StoreError> {
        Ok(self.inner.commit().await?)
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(self.inner.rollback().await?)
    }
}
