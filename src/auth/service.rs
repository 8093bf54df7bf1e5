//! Token lifecycle: issue on login, validate per request, revoke on logout.
//!
//! A token is usable only while two independent conditions hold: its exact
//! string is a live key in the [`TokenCache`], and its signature and `exp`
//! claim verify. Revocation removes the cache key and leaves the signed claim
//! untouched, which is enough because [`AuthService::validate`] requires both.

use chrono::{Duration, Utc};
use std::sync::Arc;

use super::password::{hash_password, verify_password};
use super::token::{generate_token, verify_token, Claims};
use crate::error::AppError;
use crate::models::User;
use crate::store::{TokenCache, UserStore};

/// Message for every rejected token, whatever the cause.
pub const INVALID_TOKEN: &str = "Invalid or expired token";
/// Message for a failed login, whether the user or the password was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Identity extracted from a validated token and attached to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HS256 key. `None` makes issue and validate fail with a server error.
    pub secret: Option<String>,
    pub token_lifetime: Duration,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: None,
            token_lifetime: Duration::hours(24),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenCache>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenCache>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users,
            tokens,
            settings,
        }
    }

    fn secret(&self) -> Result<&str, AppError> {
        self.settings
            .secret
            .as_deref()
            .ok_or_else(|| AppError::InternalServerError("JWT_SECRET not set".into()))
    }

    /// Creates a user with a bcrypt-hashed password.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let password_hash = hash_password(password, self.settings.bcrypt_cost)?;
        let user = self.users.create(username, &password_hash).await?;
        log::info!("Registered user {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Checks credentials and returns a fresh token, recorded in the cache for
    /// exactly the claim's lifetime.
    pub async fn issue(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                log::debug!("Login rejected: unknown user");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };
        if !verify_password(password, &user.password_hash)? {
            log::debug!("Login rejected: password mismatch for user id {}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let secret = self.secret()?;
        let now = Utc::now();
        let claims = Claims::new(user.id, &user.username, now, self.settings.token_lifetime);
        let token = generate_token(&claims, secret)?;

        let ttl = std::time::Duration::from_secs(claims.remaining_secs(now));
        self.tokens.put(&token, user.id, ttl).await?;

        log::info!("Issued token for user {} (id {})", user.username, user.id);
        Ok(token)
    }

    /// Cache presence first (the revocation signal), then signature, algorithm
    /// and expiry. Every rejection reads the same to the caller.
    pub async fn validate(&self, token: &str) -> Result<Identity, AppError> {
        if token.trim().is_empty() {
            return Err(AppError::Unauthorized(INVALID_TOKEN.into()));
        }
        let secret = self.secret()?;

        if !self.tokens.contains(token).await? {
            log::debug!("Token rejected: not present in cache");
            return Err(AppError::Unauthorized(INVALID_TOKEN.into()));
        }

        match verify_token(token, secret) {
            Ok(claims) => Ok(claims.into()),
            Err(e) => {
                log::debug!("Token rejected: {}", e);
                Err(AppError::Unauthorized(INVALID_TOKEN.into()))
            }
        }
    }

    /// Drops the token's cache entry. Absent entries are fine.
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        self.tokens.remove(token).await
    }
}
