//! Persistence seams.
//!
//! Services talk to storage only through these traits. Production wiring uses
//! [`postgres`] for users and tasks and [`redis_cache`] for live tokens; [`memory`]
//! provides in-process versions with the same semantics.

pub mod memory;
pub mod postgres;
pub mod redis_cache;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::AppError;
use crate::models::{Page, Task, TaskFilter, TaskInput, User, UserCredentials};

/// Credential store: user identities and their password hashes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. A taken username is `AppError::BadRequest`.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_by_username(&self, username: &str)
        -> Result<Option<UserCredentials>, AppError>;
}

/// Task store with filtered, paginated listing.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Matching tasks ordered by id descending, restricted to `page`.
    async fn list(&self, filter: &TaskFilter, page: Page) -> Result<Vec<Task>, AppError>;

    /// Size of the filtered set, ignoring pagination.
    async fn count(&self, filter: &TaskFilter) -> Result<i64, AppError>;

    async fn create(&self, input: &TaskInput) -> Result<Task, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Task>, AppError>;

    /// Overwrites title, description, status and due date. `None` when absent.
    async fn update(&self, id: i64, input: &TaskInput) -> Result<Option<Task>, AppError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// Key-value cache of live tokens. Presence of a key is what makes a token usable.
#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn put(&self, token: &str, user_id: i64, ttl: Duration) -> Result<(), AppError>;

    async fn contains(&self, token: &str) -> Result<bool, AppError>;

    /// Deleting an absent key is not an error.
    async fn remove(&self, token: &str) -> Result<(), AppError>;
}
