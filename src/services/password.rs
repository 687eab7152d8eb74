use crate::error::AppError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost).map_err(|e| {
        tracing::error!("password hashing failed: {e}");
        AppError::Internal("error occurred while hashing the password".into())
    })
}

/// False on mismatch and on a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
