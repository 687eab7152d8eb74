use std::env;
use std::time::Duration;

/// Secret substituted when `SECRET_KEY` is empty and insecure mode is opted into.
pub const DEV_FALLBACK_SECRET: &str = "test";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub host: String,
    pub port: u16,
    pub store_timeout: Duration,
    pub bcrypt_cost: u32,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let allow_insecure = env::var("ALLOW_INSECURE_DEV_SECRET")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            secret_key: resolve_secret(env::var("SECRET_KEY").ok(), allow_insecure)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            store_timeout: Duration::from_secs(
                env::var("STORE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "100".into())
                    .parse()?,
            ),
            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                .parse()?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".into())
                .parse()?,
        })
    }

    /// Config for an in-process server backed by the in-memory store.
    #[cfg(test)]
    pub(crate) fn in_memory(secret_key: impl Into<String>) -> Self {
        Self {
            database_url: crate::db::MEMORY_URL.into(),
            secret_key: secret_key.into(),
            host: "127.0.0.1".into(),
            port: 0,
            store_timeout: Duration::from_secs(5),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            db_max_connections: 1,
        }
    }
}

/// An empty or missing secret is refused unless the caller explicitly allows
/// the development fallback.
pub fn resolve_secret(secret: Option<String>, allow_insecure: bool) -> anyhow::Result<String> {
    match secret.filter(|s| !s.is_empty()) {
        Some(secret) => Ok(secret),
        None if allow_insecure => {
            tracing::warn!(
                "SECRET_KEY is not set; signing tokens with the insecure development fallback"
            );
            Ok(DEV_FALLBACK_SECRET.to_string())
        }
        None => Err(anyhow::anyhow!(
            "Missing required env var: SECRET_KEY (set ALLOW_INSECURE_DEV_SECRET=true to use the development fallback)"
        )),
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
