use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Matches the `VARCHAR(255)` title column.
const MAX_TITLE_LEN: usize = 255;

/// Lifecycle state of a task. Stored as plain text in the `status` column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(invalid("required", "Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(invalid("length", "Title must be at most 255 characters"));
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    match TaskStatus::parse(status) {
        Some(_) => Ok(()),
        None => Err(invalid(
            "status",
            "Invalid status. Use 'pending' or 'completed'",
        )),
    }
}

/// Input structure for creating or updating a task.
///
/// `title` and `status` default to empty and `status` stays a string, so a
/// missing or unknown value is reported as a validation failure instead of a
/// body parse failure. Anything other than a JSON object is a parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(remote = "Self")]
pub struct TaskInput {
    #[serde(default)]
    #[validate(custom = "validate_title")]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(custom = "validate_status")]
    pub status: String,

    /// Calendar date, `YYYY-MM-DD`.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

super::object_only!(TaskInput);

/// A task record as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Store-assigned, monotonically increasing identifier.
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    /// Set once on insert.
    pub created_at: DateTime<Utc>,
}

/// Query parameters accepted by `GET /tasks`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Filters applied to a listing. Both are optional and AND'd together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact match on status.
    pub status: Option<String>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
}

impl TaskFilter {
    /// Empty strings mean "no filter".
    pub fn new(status: Option<String>, search: Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            status: non_empty(status),
            search: non_empty(search),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = &self.status {
            if &task.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            return task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle);
        }
        true
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    /// Non-positive values fall back to the defaults; `limit` is capped at
    /// [`Page::MAX_LIMIT`].
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(Self::DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// Pagination block of the listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_tasks: i64,
}

/// Body of `GET /tasks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, status: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: String::new(),
            status: status.to_string(),
            due_date: None,
        }
    }

    fn task(title: &str, description: &str, status: &str) -> Task {
        Task {
            id: 1,
            title: title.into(),
            description: description.into(),
            status: status.into(),
            due_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Valid Task", "pending").validate().is_ok());
        assert!(input("Valid Task", "completed").validate().is_ok());
        assert!(input("", "pending").validate().is_err());
        assert!(input("   ", "pending").validate().is_err());
        assert!(input(&"a".repeat(256), "pending").validate().is_err());
        assert!(input("Valid Task", "archived").validate().is_err());
        assert!(input("Valid Task", "Pending").validate().is_err());
    }

    #[test]
    fn test_due_date_parses_calendar_date() {
        let parsed: TaskInput = serde_json::from_str(
            r#"{"title":"T","status":"pending","due_date":"2025-03-10"}"#,
        )
        .unwrap();
        assert_eq!(parsed.due_date, NaiveDate::from_ymd_opt(2025, 3, 10));
        assert_eq!(parsed.description, "");

        let bad = serde_json::from_str::<TaskInput>(
            r#"{"title":"T","status":"pending","due_date":"10/03/2025"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_task_input_requires_an_object() {
        for body in [r#"["T","d","pending"]"#, r#"[]"#, r#""T""#, "null"] {
            assert!(
                serde_json::from_str::<TaskInput>(body).is_err(),
                "body {} was accepted",
                body
            );
        }

        let empty: TaskInput = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.title, "");
        assert_eq!(empty.status, "");
    }

    #[test]
    fn test_filter_ignores_empty_values() {
        let filter = TaskFilter::new(Some(String::new()), Some(String::new()));
        assert_eq!(filter, TaskFilter::default());
    }

    #[test]
    fn test_filter_matching() {
        let filter = TaskFilter::new(Some("pending".into()), Some("REPORT".into()));
        assert!(filter.matches(&task("Write report", "", "pending")));
        assert!(filter.matches(&task("Misc", "quarterly Report", "pending")));
        assert!(!filter.matches(&task("Write report", "", "completed")));
        assert!(!filter.matches(&task("Groceries", "", "pending")));
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(Page::new(None, None), Page { page: 1, limit: 10 });
        assert_eq!(Page::new(Some(0), Some(-5)), Page { page: 1, limit: 10 });
        assert_eq!(Page::new(Some(-3), Some(1000)), Page { page: 1, limit: 100 });
        assert_eq!(Page::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_total_pages() {
        let page = Page::new(Some(1), Some(10));
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_pages(11), 2);
    }
}
