pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error, web};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Malformed bodies, ids and query strings all answer 400 with the JSON error shape.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {}", err);
        error::Error::from(AppError::BadRequest("Invalid request body".into()))
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected path: {}", err);
        error::Error::from(AppError::BadRequest("Invalid task ID".into()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected query: {}", err);
        error::Error::from(AppError::BadRequest("Invalid query parameters".into()))
    }));
}

/// Registers every route. Expects `web::Data<AuthService>` and
/// `web::Data<TaskService>` to be present as app data.
pub fn config(cfg: &mut web::ServiceConfig) {
    extractor_configs(cfg);

    cfg.service(health::health)
        .service(auth::register)
        .service(auth::login)
        .service(
            web::scope("/logout")
                .wrap(AuthMiddleware)
                .service(auth::logout),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
