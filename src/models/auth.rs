use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// Claims embedded in the access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub uid: String,
    pub user_type: UserRole,
    pub exp: i64,
}

/// Claims embedded in the refresh token. Only the expiry is carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub exp: i64,
}

/// Identity used to mint a token pair.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub user_type: UserRole,
    pub uid: &'a str,
}

/// Access token + refresh token.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Set by the access guard from a verified token, available via Axum extractors
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub uid: String,
    pub user_type: UserRole,
}

impl From<Claims> for AuthenticatedUser {
    fn from(c: Claims) -> Self {
        Self {
            email: c.email,
            first_name: c.first_name,
            last_name: c.last_name,
            uid: c.uid,
            user_type: c.user_type,
        }
    }
}
