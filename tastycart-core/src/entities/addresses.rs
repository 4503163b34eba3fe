use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// A customer's saved shipping address. One row per uid.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AddressRecord {
    pub id: i64,
    pub uid: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub house_details: Option<String>,
    pub area_details: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
/// Insert or replace the saved address for `uid`.
pub struct UpsertAddress {
    pub uid: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub house_details: Option<String>,
    pub area_details: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Outcome of an [`UpsertAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct AddressUpsert {
    pub id: i64,
    pub inserted: bool,
}

impl Processor<UpsertAddress> for DatabaseProcessor {
    type Output = AddressUpsert;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpsertAddress")]
    async fn process(&self, cmd: UpsertAddress) -> Result<AddressUpsert, sqlx::Error> {
        // xmax is 0 only for a freshly inserted tuple
        sqlx::query_as::<_, AddressUpsert>(
            r#"
            INSERT INTO addresses
                (uid, first_name, last_name, house_details, area_details, landmark,
                 city, state, pincode, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (uid) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                house_details = EXCLUDED.house_details,
                area_details = EXCLUDED.area_details,
                landmark = EXCLUDED.landmark,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                pincode = EXCLUDED.pincode,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email
            RETURNING id, (xmax = 0) AS inserted
            "#,
        )
        .bind(cmd.uid)
        .bind(cmd.first_name)
        .bind(cmd.last_name)
        .bind(cmd.house_details)
        .bind(cmd.area_details)
        .bind(cmd.landmark)
        .bind(cmd.city)
        .bind(cmd.state)
        .bind(cmd.pincode)
        .bind(cmd.phone)
        .bind(cmd.email)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetAddressesByUid {
    pub uid: String,
}

impl Processor<GetAddressesByUid> for DatabaseProcessor {
    type Output = Vec<AddressRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetAddressesByUid")]
    async fn process(&self, query: GetAddressesByUid) -> Result<Vec<AddressRecord>, sqlx::Error> {
        sqlx::query_as::<_, AddressRecord>(
            r#"
            SELECT id, uid, first_name, last_name, house_details, area_details, landmark,
                   city, state, pincode, phone, email
            FROM addresses
            WHERE uid = $1
            "#,
        )
        .bind(query.uid)
        .fetch_all(&self.pool)
        .await
    }
}
