use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Admin => "ADMIN",
            UserRole::User => "USER",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "USER" => Ok(UserRole::User),
            _ => Err(anyhow::anyhow!("Unknown role: {s}")),
        }
    }
}

/// Stored user record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_type: UserRole,
    /// Access token issued at the last signup/login.
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Request/Response DTOs
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub user_type: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Acknowledgement returned after a user document is inserted.
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertAck {
    pub inserted_id: String,
}

/// One page of users plus the total number of stored users.
#[derive(Debug, Serialize)]
pub struct UserPage {
    pub total_count: u64,
    pub user_items: Vec<User>,
}

pub const DEFAULT_RECORDS_PER_PAGE: u64 = 10;

/// Raw pagination parameters. Kept as strings so that malformed values fall
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
    pub page: Option<String>,
}

impl ListUsersQuery {
    /// Returns `(start_index, record_per_page)`.
    pub fn window(&self) -> (u64, u64) {
        let record_per_page = positive(self.record_per_page.as_deref())
            .unwrap_or(DEFAULT_RECORDS_PER_PAGE);
        let page = positive(self.page.as_deref()).unwrap_or(1);
        ((page - 1).saturating_mul(record_per_page), record_per_page)
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            first_name: "A".into(),
            last_name: "B".into(),
            password: "secret1".into(),
            email: "a@b.com".into(),
            phone: "123".into(),
            user_type: UserRole::User,
        }
    }

    #[test]
    fn role_uses_uppercase_wire_names() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        let parsed: UserRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(parsed, UserRole::User);
        assert!(serde_json::from_str::<UserRole>("\"ROOT\"").is_err());
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn signup_validation() {
        assert!(signup().validate().is_ok());

        let mut short_password = signup();
        short_password.password = "12345".into();
        assert!(short_password.validate().is_err());

        let mut bad_email = signup();
        bad_email.email = "not-an-email".into();
        assert!(bad_email.validate().is_err());

        let mut no_phone = signup();
        no_phone.phone = String::new();
        assert!(no_phone.validate().is_err());

        let mut long_name = signup();
        long_name.first_name = "x".repeat(101);
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn pagination_defaults_and_fallbacks() {
        assert_eq!(ListUsersQuery::default().window(), (0, 10));

        let q = ListUsersQuery {
            record_per_page: Some("5".into()),
            page: Some("3".into()),
        };
        assert_eq!(q.window(), (10, 5));

        let q = ListUsersQuery {
            record_per_page: Some("abc".into()),
            page: Some("0".into()),
        };
        assert_eq!(q.window(), (0, 10));

        let q = ListUsersQuery {
            record_per_page: Some("-2".into()),
            page: Some("2".into()),
        };
        assert_eq!(q.window(), (10, 10));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let now = Utc::now();
        let user = User {
            user_id: "u1".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.com".into(),
            phone: "123".into(),
            password_hash: "$2b$04$hash".into(),
            user_type: UserRole::User,
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["user_type"], "USER");
    }
}
