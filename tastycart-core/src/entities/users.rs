use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use sqlx::PgExecutor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub uid: String,
    pub phone: Option<String>,
    pub created_at: time::PrimitiveDateTime,
}

impl UserRecord {
    /// Insert the user unless the uid already exists, returning the row
    /// either way.
    ///
    /// Returns `None` only when a concurrent transaction inserted the same uid
    /// after this statement took its snapshot; callers retry once.
    pub async fn insert_or_fetch<'e, E: PgExecutor<'e>>(
        executor: E,
        uid: &str,
        phone: Option<&str>,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO users (uid, phone)
                VALUES ($1, $2)
                ON CONFLICT (uid) DO NOTHING
                RETURNING id, uid, phone, created_at
            )
            SELECT id, uid, phone, created_at FROM inserted
            UNION ALL
            SELECT id, uid, phone, created_at FROM users WHERE uid = $1
            LIMIT 1
            "#,
        )
        .bind(uid)
        .bind(phone)
        .fetch_optional(executor)
        .await
    }
}

#[derive(Debug, Clone)]
/// Look up a user by uid, creating the row on first contact.
pub struct GetOrCreateUser {
    pub uid: String,
    pub phone: Option<String>,
}

impl Processor<GetOrCreateUser> for DatabaseProcessor {
    type Output = UserRecord;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOrCreateUser")]
    async fn process(&self, cmd: GetOrCreateUser) -> Result<UserRecord, sqlx::Error> {
        for _ in 0..2 {
            if let Some(user) =
                UserRecord::insert_or_fetch(&self.pool, &cmd.uid, cmd.phone.as_deref()).await?
            {
                return Ok(user);
            }
        }
        Err(sqlx::Error::RowNotFound)
    }
}

#[derive(Debug, Clone)]
pub struct GetUserByUid {
    pub uid: String,
}

impl Processor<GetUserByUid> for DatabaseProcessor {
    type Output = Option<UserRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserByUid")]
    async fn process(&self, query: GetUserByUid) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, uid, phone, created_at
            FROM users
            WHERE uid = $1
            "#,
        )
        .bind(query.uid)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct ListUsers {
    pub limit: i64,
    pub offset: i64,
}

impl Processor<ListUsers> for DatabaseProcessor {
    type Output = Vec<UserRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListUsers")]
    async fn process(&self, query: ListUsers) -> Result<Vec<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, uid, phone, created_at
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
    }
}
