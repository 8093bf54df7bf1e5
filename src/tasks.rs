//! Task service: validation in front of the task store, plus the listing query.

use std::sync::Arc;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Page, Pagination, Task, TaskFilter, TaskInput, TaskList};
use crate::store::TaskStore;

pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Filtered page plus the filtered total.
    ///
    /// The page and the count are separate store reads run concurrently; the
    /// first failure aborts the listing. The two reads are not a single
    /// snapshot, so concurrent writes can make them disagree momentarily.
    pub async fn list(&self, filter: &TaskFilter, page: Page) -> Result<TaskList, AppError> {
        let (tasks, total) =
            futures::try_join!(self.store.list(filter, page), self.store.count(filter))?;

        Ok(TaskList {
            tasks,
            pagination: Pagination {
                current_page: page.page,
                limit: page.limit,
                total_pages: page.total_pages(total),
                total_tasks: total,
            },
        })
    }

    pub async fn create(&self, input: &TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        self.store.create(input).await
    }

    pub async fn get(&self, id: i64) -> Result<Task, AppError> {
        self.store.get(id).await?.ok_or_else(not_found)
    }

    /// Last writer wins; there is no version check.
    pub async fn update(&self, id: i64, input: &TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        self.store.update(id, input).await?.ok_or_else(not_found)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(not_found())
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}
