//! In-process stores.
//!
//! Same contracts as the Postgres and Redis backends, held in `RwLock`ed maps.
//! Used by the test suite and handy for running the API without infrastructure.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::{TaskStore, TokenCache, UserStore};
use crate::error::AppError;
use crate::models::{Page, Task, TaskFilter, TaskInput, User, UserCredentials};

fn poisoned<T>(_: T) -> AppError {
    AppError::InternalServerError("in-memory store lock poisoned".into())
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<(i64, HashMap<String, UserCredentials>)>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut guard = self.users.write().map_err(poisoned)?;
        let (last_id, users) = &mut *guard;
        if users.contains_key(username) {
            return Err(AppError::BadRequest("Username already taken".into()));
        }
        *last_id += 1;
        let row = UserCredentials {
            id: *last_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(username.to_string(), row.clone());
        Ok(row.into())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let guard = self.users.read().map_err(poisoned)?;
        Ok(guard.1.get(username).cloned())
    }
}

/// Tasks keyed by id; the `BTreeMap` gives id ordering for free.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<(i64, BTreeMap<i64, Task>)>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, filter: &TaskFilter, page: Page) -> Result<Vec<Task>, AppError> {
        let guard = self.tasks.read().map_err(poisoned)?;
        Ok(guard
            .1
            .values()
            .rev()
            .filter(|task| filter.matches(task))
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &TaskFilter) -> Result<i64, AppError> {
        let guard = self.tasks.read().map_err(poisoned)?;
        Ok(guard.1.values().filter(|task| filter.matches(task)).count() as i64)
    }

    async fn create(&self, input: &TaskInput) -> Result<Task, AppError> {
        let mut guard = self.tasks.write().map_err(poisoned)?;
        let (last_id, tasks) = &mut *guard;
        *last_id += 1;
        let task = Task {
            id: *last_id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status.clone(),
            due_date: input.due_date,
            created_at: Utc::now(),
        };
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, AppError> {
        let guard = self.tasks.read().map_err(poisoned)?;
        Ok(guard.1.get(&id).cloned())
    }

    async fn update(&self, id: i64, input: &TaskInput) -> Result<Option<Task>, AppError> {
        let mut guard = self.tasks.write().map_err(poisoned)?;
        Ok(guard.1.get_mut(&id).map(|task| {
            task.title = input.title.clone();
            task.description = input.description.clone();
            task.status = input.status.clone();
            task.due_date = input.due_date;
            task.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut guard = self.tasks.write().map_err(poisoned)?;
        Ok(guard.1.remove(&id).is_some())
    }
}

/// Token cache with per-entry deadlines. Expired entries are dropped when read
/// and swept on every insert, so tokens that are never presented again do not pile up.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    entries: RwLock<HashMap<String, (i64, Instant)>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .map(|entries| entries.values().filter(|(_, deadline)| *deadline > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenCache for MemoryTokenCache {
    async fn put(&self, token: &str, user_id: i64, ttl: Duration) -> Result<(), AppError> {
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.retain(|_, (_, deadline)| *deadline > now);
        entries.insert(token.to_string(), (user_id, now + ttl));
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, AppError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let live = match entries.get(token) {
            Some((_, deadline)) => *deadline > Instant::now(),
            None => return Ok(false),
        };
        if !live {
            entries.remove(token);
        }
        Ok(live)
    }

    async fn remove(&self, token: &str) -> Result<(), AppError> {
        self.entries.write().map_err(poisoned)?.remove(token);
        Ok(())
    }
}
