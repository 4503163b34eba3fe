use super::{OrderStore, StoreError, StoreTransaction, check_payload_version};
use crate::entities::OrderStatus;
use crate::entities::now_utc;
use crate::entities::orders::{NewOrder, ORDER_PAYLOAD_VERSION, OrderRecord, PaymentSettlement};
use crate::entities::users::UserRecord;
use async_trait::async_trait;
use sqlx::types::Json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: Vec<UserRecord>,
    orders: Vec<OrderRecord>,
    next_user_id: i64,
    next_order_id: i64,
}

/// In-process [`OrderStore`] with the same transition rules as [`PgStore`].
///
/// A transaction holds the whole store exclusively and works on a copy that
/// replaces the shared state on commit, so transactions are fully serialized.
///
/// [`PgStore`]: super::PgStore
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    transactions_opened: Arc<AtomicUsize>,
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transactions opened so far, committed or not.
    pub fn transactions_opened(&self) -> usize {
        self.transactions_opened.load(Ordering::SeqCst)
    }

    pub async fn orders(&self) -> Vec<OrderRecord> {
        self.state.lock().await.orders.clone()
    }

    pub async fn users(&self) -> Vec<UserRecord> {
        self.state.lock().await.users.clone()
    }

    pub async fn order_by_gateway_order_id(&self, gateway_order_id: &str) -> Option<OrderRecord> {
        self.state
            .lock()
            .await
            .orders
            .iter()
            .find(|o| o.gateway_order_id == gateway_order_id)
            .cloned()
    }

    /// Store a row as-is, bypassing the transition rules.
    pub async fn put_order(&self, order: OrderRecord) {
        let mut state = self.state.lock().await;
        state.next_order_id = state.next_order_id.max(order.id);
        state.orders.retain(|o| o.id != order.id);
        state.orders.push(order);
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction, StoreError> {
        self.transactions_opened.fetch_add(1, Ordering::SeqCst);
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTransaction { guard, working })
    }
}

impl MemoryTransaction {
    fn order_mut(&mut self, order_id: i64) -> Option<&mut OrderRecord> {
        self.working.orders.iter_mut().find(|o| o.id == order_id)
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn get_or_create_user(
        &mut self,
        uid: &str,
        phone: Option<&str>,
    ) -> Result<UserRecord, StoreError> {
        if let Some(user) = self.working.users.iter().find(|u| u.uid == uid) {
            return Ok(user.clone());
        }
        self.working.next_user_id += 1;
        let user = UserRecord {
            id: self.working.next_user_id,
            uid: uid.to_string(),
            phone: phone.map(str::to_string),
            created_at: now_utc(),
        };
        self.working.users.push(user.clone());
        Ok(user)
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderRecord, StoreError> {
        if self
            .working
            .orders
            .iter()
            .any(|o| o.gateway_order_id == order.gateway_order_id)
        {
            return Err(StoreError::Duplicate("orders_gateway_order_id_key".into()));
        }
        self.working.next_order_id += 1;
        let now = now_utc();
        let record = OrderRecord {
            id: self.working.next_order_id,
            gateway_order_id: order.gateway_order_id,
            user_id: order.user_id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
            status: OrderStatus::Created,
            payload_version: ORDER_PAYLOAD_VERSION,
            items: Json(order.items),
            address: Json(order.address),
            gateway_payment_id: None,
            gateway_signature: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        self.working.orders.push(record.clone());
        Ok(record)
    }

    async fn order_by_gateway_order_id(
        &mut self,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, StoreError> {
        self.working
            .orders
            .iter()
            .find(|o| o.gateway_order_id == gateway_order_id)
            .cloned()
            .map(check_payload_version)
            .transpose()
    }

    async fn order_by_payment_id(
        &mut self,
        payment_id: &str,
    ) -> Result<Option<OrderRecord>, StoreError> {
        self.working
            .orders
            .iter()
            .find(|o| o.gateway_payment_id.as_deref() == Some(payment_id))
            .cloned()
            .map(check_payload_version)
            .transpose()
    }

    async fn mark_paid(
        &mut self,
        order_id: i64,
        settlement: PaymentSettlement,
    ) -> Result<OrderRecord, StoreError> {
        let payment_id = settlement.payment_id.as_str();
        if self
            .working
            .orders
            .iter()
            .any(|o| o.id != order_id && o.gateway_payment_id.as_deref() == Some(payment_id))
        {
            return Err(StoreError::Duplicate("orders_gateway_payment_id_key".into()));
        }
        let order = self
            .order_mut(order_id)
            .filter(|o| o.status == OrderStatus::Created)
            .ok_or(StoreError::StaleOrder(order_id))?;
        order.status = OrderStatus::Paid;
        order.gateway_payment_id = Some(settlement.payment_id);
        order.gateway_signature = Some(settlement.signature);
        order.paid_at = Some(settlement.paid_at);
        order.updated_at = settlement.paid_at;
        Ok(order.clone())
    }

    async fn mark_refunded(&mut self, order_id: i64) -> Result<(), StoreError> {
        let order = self
            .order_mut(order_id)
            .filter(|o| o.status == OrderStatus::Paid)
            .ok_or(StoreError::StaleOrder(order_id))?;
        order.status = OrderStatus::Refunded;
        order.updated_at = now_utc();
        Ok(())
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}
