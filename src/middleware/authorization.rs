//! Role and ownership checks applied by handlers after the access guard.

use crate::{error::AppError, models::auth::AuthenticatedUser, models::user::UserRole};

/// The caller's role must equal `required`.
pub fn check_user_type(caller: &AuthenticatedUser, required: UserRole) -> Result<(), AppError> {
    if caller.user_type != required {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Owner-or-role gate for a resource belonging to `user_id`.
///
/// | caller role | caller uid == user_id | outcome                        |
/// |-------------|-----------------------|--------------------------------|
/// | USER        | yes                   | allow                          |
/// | USER        | no                    | reject, role check never runs  |
/// | other       | any                   | `check_user_type(required)`    |
pub fn match_user_type_to_uid(
    caller: &AuthenticatedUser,
    user_id: &str,
    required: UserRole,
) -> Result<(), AppError> {
    match caller.user_type {
        UserRole::User if caller.uid == user_id => Ok(()),
        UserRole::User => Err(AppError::Forbidden),
        _ => check_user_type(caller, required),
    }
}
