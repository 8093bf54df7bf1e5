#![doc = "The `taskgate` library crate."]
#![doc = ""]
#![doc = "Task CRUD behind bearer-token authentication. Tokens are HS256 JWTs that"]
#![doc = "are only honoured while present in a token cache, so logout revokes them."]
#![doc = "The binary (`main.rs`) wires the Postgres and Redis stores into the routes."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;

pub use crate::error::AppError;
