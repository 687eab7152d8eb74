pub mod memory;
pub mod users;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::models::user::{User, UserPage};

pub use memory::InMemoryUserStore;
pub use users::PgUserStore;

/// `DATABASE_URL` value selecting the in-memory store.
pub const MEMORY_URL: &str = "memory://";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("duplicate email or phone")]
    Duplicate,
    #[error("user {0} not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence seam for user documents.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// True if any stored user already has this email or this phone.
    async fn email_or_phone_taken(&self, email: &str, phone: &str) -> Result<bool, StoreError>;

    /// Inserts a new user, returning its id.
    async fn insert(&self, user: &User) -> Result<String, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Overwrites the stored token pair and bumps `updated_at`.
    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Users ordered by creation, skipping `start_index` and returning at most `limit`.
    async fn list(&self, start_index: u64, limit: u64) -> Result<UserPage, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Runs a store operation under the configured time budget.
pub async fn bounded<T, F>(budget: Duration, op: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(budget, op).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("store operation abandoned after {budget:?}");
            Err(StoreError::Timeout(budget))
        }
    }
}

pub async fn create_pool(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.store_timeout)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded in ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Opens the store named by `config.database_url`. Fails if the URL is unusable.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn UserStore>> {
    if config.database_url == MEMORY_URL {
        tracing::warn!("Using the in-memory user store; data is lost on exit");
        return Ok(Arc::new(InMemoryUserStore::new()));
    }

    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database connected and migrations applied");
    Ok(Arc::new(PgUserStore::new(pool)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bounded_abandons_slow_operations() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(200)).await;
            Ok::<_, StoreError>(())
        };
        let result = bounded(Duration::from_secs(100), slow).await;
        assert!(matches!(result, Err(StoreError::Timeout(d)) if d == Duration::from_secs(100)));
    }

    #[tokio::test]
    async fn bounded_passes_through_results() {
        let value = bounded(Duration::from_secs(1), async { Ok::<_, StoreError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
