//! Access/refresh token issuance and verification.
//!
//! Both tokens are HS256 JWTs signed with the same secret. The access token
//! carries the caller's identity and lives 24 hours; the refresh token only
//! carries its expiry and lives 168 hours.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::{Claims, RefreshClaims, TokenPair, TokenSubject};

pub const ACCESS_TOKEN_TTL_HOURS: i64 = 24;
pub const REFRESH_TOKEN_TTL_HOURS: i64 = 168;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
    /// Structural or signature failure; carries the decoder's reason.
    #[error("{0}")]
    Invalid(String),
    #[error("token expired")]
    Expired,
}

/// Issues an access/refresh pair expiring relative to now.
pub fn generate_all_tokens(subject: &TokenSubject<'_>, secret: &str) -> Result<TokenPair, TokenError> {
    generate_all_tokens_at(subject, secret, Utc::now())
}

/// Issues an access/refresh pair expiring relative to `issued_at`.
pub fn generate_all_tokens_at(
    subject: &TokenSubject<'_>,
    secret: &str,
    issued_at: DateTime<Utc>,
) -> Result<TokenPair, TokenError> {
    let claims = Claims {
        email: subject.email.to_string(),
        first_name: subject.first_name.to_string(),
        last_name: subject.last_name.to_string(),
        uid: subject.uid.to_string(),
        user_type: subject.user_type,
        exp: (issued_at + Duration::hours(ACCESS_TOKEN_TTL_HOURS)).timestamp(),
    };
    let refresh_claims = RefreshClaims {
        exp: (issued_at + Duration::hours(REFRESH_TOKEN_TTL_HOURS)).timestamp(),
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::new(Algorithm::HS256);

    let token = encode(&header, &claims, &key).map_err(TokenError::Signing)?;
    let refresh_token = encode(&header, &refresh_claims, &key).map_err(TokenError::Signing)?;

    Ok(TokenPair { token, refresh_token })
}

/// Verifies signature then expiry against the current instant.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    validate_token_at(token, secret, Utc::now())
}

/// Verifies the signature, then rejects claims whose expiry lies before `now`.
pub fn validate_token_at(token: &str, secret: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against `now`, without leeway.
    validation.validate_exp = false;

    let claims = decode::<Claims>(token, &key, &validation)
        .map_err(|e| TokenError::Invalid(e.to_string()))?
        .claims;

    if claims.exp < now.timestamp() {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}
