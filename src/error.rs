//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every layer (stores, services, handlers, middleware) returns `AppError`, so the
//! `?` operator carries failures straight up to the HTTP boundary.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application
//! errors into HTTP responses with JSON bodies. Server-side failures are logged with
//! their detail and answered with a generic message; the detail never reaches the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned for every 500-class error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Field order used to pick the message reported for a failed validation.
const FIELD_ORDER: [&str; 5] = ["username", "password", "title", "description", "status"];

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    Unauthorized(String),
    /// Malformed request: bad JSON, bad path id, bad query string (HTTP 400).
    BadRequest(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Input deserialized but broke a field rule (HTTP 400).
    ValidationError(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the relational store (HTTP 500).
    DatabaseError(String),
    /// Failure reported by the token cache (HTTP 500).
    CacheError(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_)
            | AppError::DatabaseError(_)
            | AppError::CacheError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::CacheError(msg) => write!(f, "Cache Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Client errors echo their message. Server errors are logged here, once, and
/// replaced by [`INTERNAL_ERROR_MESSAGE`].
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
            AppError::InternalServerError(_)
            | AppError::DatabaseError(_)
            | AppError::CacheError(_) => {
                log::error!("{}", self);
                INTERNAL_ERROR_MESSAGE
            }
        };
        HttpResponse::build(self.status()).json(json!({ "error": message }))
    }
}

impl AppError {
    /// Prefixes server-side errors with the operation that failed. Client
    /// errors keep their message, since it is what the caller sees.
    pub fn context(self, operation: &str) -> AppError {
        match self {
            AppError::DatabaseError(msg) => AppError::DatabaseError(format!("{}: {}", operation, msg)),
            AppError::CacheError(msg) => AppError::CacheError(format!("{}: {}", operation, msg)),
            AppError::InternalServerError(msg) => {
                AppError::InternalServerError(format!("{}: {}", operation, msg))
            }
            other => other,
        }
    }
}

/// Attaches an operation name to a failed store or cache call.
pub trait ResultExt<T> {
    fn context(self, operation: &str) -> Result<T, AppError>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn context(self, operation: &str) -> Result<T, AppError> {
        self.map_err(|e| Into::<AppError>::into(e).context(operation))
    }
}

/// Stores read optional rows with `fetch_optional`, so every sqlx failure is a database error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

/// Reports the first failing field's message, walking fields in a fixed order
/// so the answer does not depend on hash map iteration.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let fields = errors.field_errors();
        let message = FIELD_ORDER
            .iter()
            .filter_map(|field| fields.get(field))
            .chain(fields.values())
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        AppError::ValidationError(message)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(error: redis::RedisError) -> AppError {
        AppError::CacheError(error.to_string())
    }
}

impl From<deadpool_redis::PoolError> for AppError {
    fn from(error: deadpool_redis::PoolError) -> AppError {
        AppError::CacheError(format!("connection pool: {}", error))
    }
}
