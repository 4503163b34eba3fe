use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CouponRecord {
    pub id: i64,
    pub code: String,
    pub discount_percentage: i32,
    pub is_active: bool,
    pub expiry_date: time::PrimitiveDateTime,
}

#[derive(Debug, Clone)]
/// Find an active coupon by code that has not expired yet.
pub struct FindActiveCoupon {
    pub code: String,
}

impl Processor<FindActiveCoupon> for DatabaseProcessor {
    type Output = Option<CouponRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:FindActiveCoupon")]
    async fn process(&self, query: FindActiveCoupon) -> Result<Option<CouponRecord>, sqlx::Error> {
        sqlx::query_as::<_, CouponRecord>(
            r#"
            SELECT id, code, discount_percentage, is_active, expiry_date
            FROM coupons
            WHERE code = $1
              AND is_active = TRUE
              AND expiry_date > (NOW() AT TIME ZONE 'utc')
            "#,
        )
        .bind(query.code)
        .fetch_optional(&self.pool)
        .await
    }
}
