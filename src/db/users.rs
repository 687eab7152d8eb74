use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{StoreError, UserStore};
use crate::models::user::{User, UserPage};

const USER_COLUMNS: &str = "user_id, first_name, last_name, email, phone, password_hash,
     user_type, token, refresh_token, created_at, updated_at";

/// Pages follow insertion order; `seq` is assigned by the database on insert.
const LIST_PAGE: &str = "SELECT user_id, first_name, last_name, email, phone, password_hash,
     user_type, token, refresh_token, created_at, updated_at
     FROM users
     ORDER BY seq
     OFFSET $1 LIMIT $2";

/// Postgres-backed user collection.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn email_or_phone_taken(&self, email: &str, phone: &str) -> Result<bool, StoreError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR phone = $2)",
        )
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn insert(&self, user: &User) -> Result<String, StoreError> {
        let user_id: String = sqlx::query_scalar(
            "INSERT INTO users (user_id, first_name, last_name, email, phone, password_hash,
                                user_type, token, refresh_token, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING user_id",
        )
        .bind(&user.user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.user_type)
        .bind(&user.token)
        .bind(&user.refresh_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;
        Ok(user_id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET token = $1, refresh_token = $2, updated_at = $3
             WHERE user_id = $4",
        )
        .bind(token)
        .bind(refresh_token)
        .bind(updated_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(user_id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, start_index: u64, limit: u64) -> Result<UserPage, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let user_items = sqlx::query_as::<_, User>(LIST_PAGE)
        .bind(i64::try_from(start_index).unwrap_or(i64::MAX))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(UserPage {
            total_count: total.max(0) as u64,
            user_items,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_follow_insertion_sequence() {
        assert!(LIST_PAGE.contains("ORDER BY seq"));
        for column in USER_COLUMNS.split(',').map(str::trim) {
            assert!(LIST_PAGE.contains(column), "missing column {column}");
        }
    }
}
