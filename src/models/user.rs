use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

lazy_static! {
    // Alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A user row including the stored bcrypt hash, for credential checks only.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserCredentials> for User {
    fn from(row: UserCredentials) -> Self {
        Self {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// Payload for `POST /register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(remote = "Self")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 32, message = "Username must be 3 to 32 characters"),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

super::object_only!(RegisterRequest);

/// Payload for `POST /login`. Not validated: any mismatch is `Invalid credentials`.
#[derive(Debug, Deserialize)]
#[serde(remote = "Self")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

super::object_only!(LoginRequest);

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register("test_user-123", "password123").validate().is_ok());
        assert!(register("test user!", "password123").validate().is_err());
        assert!(register("tu", "password123").validate().is_err());
        assert!(register(&"a".repeat(33), "password123").validate().is_err());
        assert!(register("testuser", "short").validate().is_err());
    }

    #[test]
    fn test_credentials_must_be_an_object() {
        let pair = r#"["alice","Password123!"]"#;
        assert!(serde_json::from_str::<RegisterRequest>(pair).is_err());
        assert!(serde_json::from_str::<LoginRequest>(pair).is_err());

        let login: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"Password123!"}"#).unwrap();
        assert_eq!(login.username, "alice");
    }

    #[test]
    fn test_credentials_strip_hash() {
        let now = Utc::now();
        let user: User = UserCredentials {
            id: 7,
            username: "alice".into(),
            password_hash: "$2b$04$abc".into(),
            created_at: now,
        }
        .into();
        assert_eq!(
            user,
            User {
                id: 7,
                username: "alice".into(),
                created_at: now,
            }
        );
    }
}
