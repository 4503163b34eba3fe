use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AdminRecord {
    pub id: i64,
    pub username: String,
    /// PHC-formatted argon2 hash.
    pub password_hash: String,
    pub is_admin: bool,
}

impl AdminRecord {
    /// Check a plaintext password against the stored hash.
    ///
    /// A malformed stored hash never matches.
    pub fn verify_password(&self, password: &str) -> bool {
        use argon2::{Argon2, PasswordHash, PasswordVerifier};

        let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
            tracing::error!(admin_id = self.id, "stored admin password hash is malformed");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct GetAdminByUsername {
    pub username: String,
}

impl Processor<GetAdminByUsername> for DatabaseProcessor {
    type Output = Option<AdminRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetAdminByUsername")]
    async fn process(&self, query: GetAdminByUsername) -> Result<Option<AdminRecord>, sqlx::Error> {
        sqlx::query_as::<_, AdminRecord>(
            r#"
            SELECT id, username, password_hash, is_admin
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(query.username)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    fn admin_with(password_hash: String) -> AdminRecord {
        AdminRecord {
            id: 1,
            username: "root".into(),
            password_hash,
            is_admin: true,
        }
    }

    #[test]
    fn test_verify_password() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"hunter2", &salt)
            .unwrap()
            .to_string();
        let admin = admin_with(hash);
        assert!(admin.verify_password("hunter2"));
        assert!(!admin.verify_password("hunter3"));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let admin = admin_with("plaintext".into());
        assert!(!admin.verify_password("plaintext"));
    }
}
