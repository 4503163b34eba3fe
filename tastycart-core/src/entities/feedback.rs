use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FeedbackRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub rating: Option<i16>,
    pub created_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone)]
pub struct InsertFeedback {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub rating: Option<i16>,
}

impl Processor<InsertFeedback> for DatabaseProcessor {
    type Output = FeedbackRecord;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertFeedback")]
    async fn process(&self, cmd: InsertFeedback) -> Result<FeedbackRecord, sqlx::Error> {
        sqlx::query_as::<_, FeedbackRecord>(
            r#"
            INSERT INTO feedback (full_name, email, phone, message, rating)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, full_name, email, phone, message, rating, created_at
            "#,
        )
        .bind(cmd.full_name)
        .bind(cmd.email)
        .bind(cmd.phone)
        .bind(cmd.message)
        .bind(cmd.rating)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct ListFeedback {
    pub limit: i64,
    pub offset: i64,
}

impl Processor<ListFeedback> for DatabaseProcessor {
    type Output = Vec<FeedbackRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListFeedback")]
    async fn process(&self, query: ListFeedback) -> Result<Vec<FeedbackRecord>, sqlx::Error> {
        sqlx::query_as::<_, FeedbackRecord>(
            r#"
            SELECT id, full_name, email, phone, message, rating, created_at
            FROM feedback
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
    }
}
