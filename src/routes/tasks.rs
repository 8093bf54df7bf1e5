use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Page, TaskFilter, TaskInput, TaskQuery},
    tasks::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Path ids must be positive integers.
fn task_id(path: web::Path<i64>) -> Result<i64, AppError> {
    let id = path.into_inner();
    if id <= 0 {
        return Err(AppError::BadRequest("Invalid task ID".into()));
    }
    Ok(id)
}

/// Lists tasks with optional filters and pagination.
///
/// ## Query Parameters:
/// - `status` (optional): exact status match, `pending` or `completed`.
/// - `search` (optional): case-insensitive substring of title or description.
/// - `page` (default 1) and `limit` (default 10, max 100). Non-positive values
///   fall back to the defaults.
///
/// ## Responses:
/// - `200 OK`: `{ "tasks": [...], "pagination": {...} }`, newest first.
/// - `401 Unauthorized`: missing, invalid, expired or revoked token.
/// - `500 Internal Server Error`: either the page or the count query failed.
#[get("")]
pub async fn get_tasks(
    service: web::Data<TaskService>,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let query = query_params.into_inner();
    let page = Page::new(query.page, query.limit);
    let filter = TaskFilter::new(query.status, query.search);

    let listing = service.list(&filter, page).await?;
    log::info!(
        "Fetched {} of {} tasks (page {}, limit {})",
        listing.tasks.len(),
        listing.pagination.total_tasks,
        page.page,
        page.limit
    );

    Ok(HttpResponse::Ok().json(listing))
}

/// Creates a task.
///
/// ## Responses:
/// - `201 Created`: `{ "message": ..., "task": Task }`.
/// - `400 Bad Request`: malformed body, empty title or unknown status.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = service.create(&task_data).await?;
    log::info!("Task {} created by {}", task.id, user.0.username);

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "task": task,
    })))
}

#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = service.get(task_id(path)?).await?;
    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Replaces title, description, status and due date of a task.
///
/// ## Responses:
/// - `200 OK`: `{ "message": ..., "task": Task }` with the stored record.
/// - `400 Bad Request`: bad id or invalid body.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    path: web::Path<i64>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = task_id(path)?;
    let task = service.update(id, &task_data).await?;
    log::info!("Task {} updated by {}", id, user.0.username);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated successfully",
        "task": task,
    })))
}

#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    path: web::Path<i64>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = task_id(path)?;
    service.delete(id).await?;
    log::info!("Task {} deleted by {}", id, user.0.username);

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
