use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    db::{bounded, UserStore},
    error::AppError,
    models::{
        auth::{TokenPair, TokenSubject},
        user::{InsertAck, LoginRequest, SignupRequest, User},
    },
    services::{
        password::{hash_password, verify_password},
        tokens::generate_all_tokens,
    },
};

/// Stored timestamps keep whole-second precision.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn issue_tokens(subject: &TokenSubject<'_>, secret: &str) -> Result<TokenPair, AppError> {
    generate_all_tokens(subject, secret).map_err(|e| {
        tracing::error!(uid = subject.uid, "token issuance failed: {e}");
        AppError::Internal("error occurred while generating tokens".into())
    })
}

pub struct AuthService;

impl AuthService {
    /// Validates and registers a new user, issuing its first token pair.
    pub async fn signup(
        store: &dyn UserStore,
        config: &Config,
        body: SignupRequest,
    ) -> Result<InsertAck, AppError> {
        body.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let taken = bounded(
            config.store_timeout,
            store.email_or_phone_taken(&body.email, &body.phone),
        )
        .await?;
        if taken {
            tracing::info!(email = %body.email, "signup rejected: email or phone already registered");
            return Err(AppError::Duplicate);
        }

        let password_hash = hash_password(&body.password, config.bcrypt_cost)?;
        let user_id = Uuid::new_v4().to_string();

        let tokens = issue_tokens(
            &TokenSubject {
                email: &body.email,
                first_name: &body.first_name,
                last_name: &body.last_name,
                user_type: body.user_type,
                uid: &user_id,
            },
            &config.secret_key,
        )?;

        let created_at = now();
        let user = User {
            user_id,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            password_hash,
            user_type: body.user_type,
            token: Some(tokens.token),
            refresh_token: Some(tokens.refresh_token),
            created_at,
            updated_at: created_at,
        };

        let inserted_id = bounded(config.store_timeout, store.insert(&user)).await?;
        tracing::info!(uid = %inserted_id, role = %user.user_type, "user registered");

        Ok(InsertAck { inserted_id })
    }

    /// Verifies credentials, rotates the stored token pair and returns the refreshed record.
    pub async fn login(
        store: &dyn UserStore,
        config: &Config,
        body: LoginRequest,
    ) -> Result<User, AppError> {
        let found = bounded(config.store_timeout, store.find_by_email(&body.email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&body.password, &found.password_hash) {
            tracing::info!(uid = %found.user_id, "login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let tokens = issue_tokens(
            &TokenSubject {
                email: &found.email,
                first_name: &found.first_name,
                last_name: &found.last_name,
                user_type: found.user_type,
                uid: &found.user_id,
            },
            &config.secret_key,
        )?;

        bounded(
            config.store_timeout,
            store.update_tokens(&found.user_id, &tokens.token, &tokens.refresh_token, now()),
        )
        .await?;

        let user = bounded(config.store_timeout, store.find_by_id(&found.user_id))
            .await?
            .ok_or(AppError::NotFound)?;
        tracing::info!(uid = %user.user_id, "user logged in");

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryUserStore;
    use crate::models::user::UserRole;
    use crate::services::tokens::validate_token;

    fn config() -> Config {
        Config {
            bcrypt_cost: 4,
            ..Config::in_memory("unit-test-secret")
        }
    }

    fn signup_body(email: &str, phone: &str) -> SignupRequest {
        SignupRequest {
            first_name: "A".into(),
            last_name: "B".into(),
            password: "secret1".into(),
            email: email.into(),
            phone: phone.into(),
            user_type: UserRole::User,
        }
    }

    #[tokio::test]
    async fn signup_stores_hashed_password_and_tokens() {
        let store = InMemoryUserStore::new();
        let config = config();

        let ack = AuthService::signup(&store, &config, signup_body("a@b.com", "123"))
            .await
            .unwrap();

        let stored = store.find_by_id(&ack.inserted_id).await.unwrap().unwrap();
        assert!(!stored.password_hash.is_empty());
        assert_ne!(stored.password_hash, "secret1");
        assert_eq!(stored.created_at, stored.updated_at);

        let claims = validate_token(stored.token.as_deref().unwrap(), &config.secret_key).unwrap();
        assert_eq!(claims.uid, ack.inserted_id);
        assert!(stored.refresh_token.is_some());
    }

    #[tokio::test]
    async fn signup_rejects_duplicates_without_writing() {
        let store = InMemoryUserStore::new();
        let config = config();
        AuthService::signup(&store, &config, signup_body("a@b.com", "123"))
            .await
            .unwrap();

        let same_email = AuthService::signup(&store, &config, signup_body("a@b.com", "456")).await;
        assert!(matches!(same_email, Err(AppError::Duplicate)));
        let same_phone = AuthService::signup(&store, &config, signup_body("c@d.com", "123")).await;
        assert!(matches!(same_phone, Err(AppError::Duplicate)));

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn signup_validation_failure_touches_nothing() {
        let store = InMemoryUserStore::new();
        let mut body = signup_body("a@b.com", "123");
        body.password = "short".into();

        let result = AuthService::signup(&store, &config(), body).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn login_rotates_tokens() {
        let store = InMemoryUserStore::new();
        let config = config();
        let ack = AuthService::signup(&store, &config, signup_body("a@b.com", "123"))
            .await
            .unwrap();

        let user = AuthService::login(
            &store,
            &config,
            LoginRequest {
                email: "a@b.com".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(user.user_id, ack.inserted_id);
        let claims = validate_token(user.token.as_deref().unwrap(), &config.secret_key).unwrap();
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.user_type, UserRole::User);
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let store = InMemoryUserStore::new();
        let config = config();
        AuthService::signup(&store, &config, signup_body("a@b.com", "123"))
            .await
            .unwrap();

        let wrong_password = AuthService::login(
            &store,
            &config,
            LoginRequest {
                email: "a@b.com".into(),
                password: "nope123".into(),
            },
        )
        .await
        .unwrap_err();
        let unknown_email = AuthService::login(
            &store,
            &config,
            LoginRequest {
                email: "x@y.com".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }
}
