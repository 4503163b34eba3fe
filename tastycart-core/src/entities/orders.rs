use crate::entities::OrderStatus;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use sqlx::PgExecutor;
use sqlx::types::Json;
use tastycart_sdk::objects::storefront::OrderDetail;
use tastycart_sdk::objects::{AddressEntry, LineItem, OrderSummary};

/// Version of the `items`/`address` JSON documents written by this build.
pub const ORDER_PAYLOAD_VERSION: i16 = 1;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub gateway_order_id: String,
    /// The owning customer's `uid`.
    pub user_id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: OrderStatus,
    pub payload_version: i16,
    pub items: Json<Vec<LineItem>>,
    pub address: Json<Vec<AddressEntry>>,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub paid_at: Option<time::PrimitiveDateTime>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

impl OrderRecord {
    /// The first shipping address, which carries the contact email.
    pub fn primary_address(&self) -> Option<&AddressEntry> {
        self.address.0.first()
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.primary_address()
            .map(|a| a.email.trim())
            .filter(|e| !e.is_empty())
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            amount: self.amount,
            currency: self.currency.clone(),
            status: self.status.into(),
            paid_at: self.paid_at.map(super::unix_timestamp),
        }
    }

    pub fn into_detail(self) -> OrderDetail {
        OrderDetail {
            id: self.id,
            gateway_order_id: self.gateway_order_id,
            user_id: self.user_id,
            amount: self.amount,
            currency: self.currency,
            receipt: self.receipt,
            status: self.status.into(),
            items: self.items.0,
            address: self.address.0,
            gateway_payment_id: self.gateway_payment_id,
            paid_at: self.paid_at.map(super::unix_timestamp),
            created_at: super::unix_timestamp(self.created_at),
        }
    }
}

/// Data for inserting a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub gateway_order_id: String,
    pub user_id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub items: Vec<LineItem>,
    pub address: Vec<AddressEntry>,
}

/// Gateway payment details recorded on the `created -> paid` transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSettlement {
    pub payment_id: String,
    pub signature: String,
    pub paid_at: time::PrimitiveDateTime,
}

impl OrderRecord {
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        sqlx::query_as::<_, OrderRecord>(
            r#"
            INSERT INTO orders
                (gateway_order_id, user_id, amount, currency, receipt, status,
                 payload_version, items, address)
            VALUES ($1, $2, $3, $4, $5, 'created', $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&order.gateway_order_id)
        .bind(&order.user_id)
        .bind(order.amount)
        .bind(&order.currency)
        .bind(&order.receipt)
        .bind(ORDER_PAYLOAD_VERSION)
        .bind(Json(&order.items))
        .bind(Json(&order.address))
        .fetch_one(executor)
        .await
    }

    /// Load an order by its gateway reference and lock the row until the
    /// surrounding transaction ends.
    pub async fn lock_by_gateway_order_id<'e, E: PgExecutor<'e>>(
        executor: E,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT * FROM orders
            WHERE gateway_order_id = $1
            FOR UPDATE
            "#,
        )
        .bind(gateway_order_id)
        .fetch_optional(executor)
        .await
    }

    /// Load an order by its gateway payment reference and lock the row.
    pub async fn lock_by_payment_id<'e, E: PgExecutor<'e>>(
        executor: E,
        payment_id: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT * FROM orders
            WHERE gateway_payment_id = $1
            FOR UPDATE
            "#,
        )
        .bind(payment_id)
        .fetch_optional(executor)
        .await
    }

    /// Settle a `created` order. Returns `None` if the row is no longer
    /// `created`.
    pub async fn mark_paid<'e, E: PgExecutor<'e>>(
        executor: E,
        order_id: i64,
        settlement: &PaymentSettlement,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        sqlx::query_as::<_, OrderRecord>(
            r#"
            UPDATE orders
            SET status = 'paid',
                gateway_payment_id = $2,
                gateway_signature = $3,
                paid_at = $4,
                updated_at = $4
            WHERE id = $1 AND status = 'created'
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(&settlement.payment_id)
        .bind(&settlement.signature)
        .bind(settlement.paid_at)
        .fetch_optional(executor)
        .await
    }

    /// Move a `paid` order to `refunded`. Returns the number of rows changed.
    pub async fn mark_refunded<'e, E: PgExecutor<'e>>(
        executor: E,
        order_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'refunded', updated_at = $2
            WHERE id = $1 AND status = 'paid'
            "#,
        )
        .bind(order_id)
        .bind(crate::entities::now_utc())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone)]
/// List all orders, newest first, optionally filtered by status.
pub struct ListOrderRecords {
    pub limit: i64,
    pub offset: i64,
    pub status: Option<OrderStatus>,
}

impl Processor<ListOrderRecords> for DatabaseProcessor {
    type Output = Vec<OrderRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListOrderRecords")]
    async fn process(&self, query: ListOrderRecords) -> Result<Vec<OrderRecord>, sqlx::Error> {
        sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT * FROM orders
            WHERE ($3::order_status IS NULL OR status = $3)
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(query.limit)
        .bind(query.offset)
        .bind(query.status)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// List one customer's orders, newest first.
pub struct ListOrderRecordsByUser {
    pub user_id: String,
}

impl Processor<ListOrderRecordsByUser> for DatabaseProcessor {
    type Output = Vec<OrderRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListOrderRecordsByUser")]
    async fn process(
        &self,
        query: ListOrderRecordsByUser,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT * FROM orders
            WHERE user_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(query.user_id)
        .fetch_all(&self.pool)
        .await
    }
}
