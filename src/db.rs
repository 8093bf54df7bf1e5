//! Postgres pool construction, embedded migrations and optional demo data.

use chrono::NaiveDate;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::models::TaskStatus;

/// Opens a pool from discrete connection settings.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    let ssl_mode = PgSslMode::from_str(&config.sslmode)
        .map_err(|e| AppError::DatabaseError(format!("Invalid DB_SSLMODE: {}", e)))?;

    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .ssl_mode(ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Applies the SQL files under `migrations/`.
pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))
}

/// Inserts three sample tasks when the table is empty. Returns how many were added.
pub async fn seed_demo_tasks(pool: &PgPool) -> Result<u64, AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        log::info!("Tasks table already has data, skipping demo seed");
        return Ok(0);
    }

    let demo = [
        ("Task 1", TaskStatus::Pending, NaiveDate::from_ymd_opt(2025, 3, 10)),
        ("Task 2", TaskStatus::Completed, NaiveDate::from_ymd_opt(2025, 3, 12)),
        ("Task 3", TaskStatus::Pending, NaiveDate::from_ymd_opt(2025, 3, 15)),
    ];

    let mut tx = pool.begin().await?;
    for (title, status, due_date) in demo {
        sqlx::query(
            "INSERT INTO tasks (title, description, status, due_date) VALUES ($1, $2, $3, $4)",
        )
        .bind(title)
        .bind(format!("Description for {}", title))
        .bind(status.as_str())
        .bind(due_date)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    log::info!("Inserted {} demo tasks", demo.len());
    Ok(demo.len() as u64)
}
