use crate::{
    auth::{bearer_token, AuthResponse, AuthService, AuthenticatedUser},
    error::AppError,
    models::{LoginRequest, RegisterRequest},
};
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates the account only; a token is obtained through `/login`.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = auth
        .register(&register_data.username, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user": user,
    })))
}

/// Login user
///
/// Authenticates a user and returns a bearer token.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = auth
        .issue(&login_data.username, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

/// Logout user
///
/// Revokes the token used on this request. Mounted behind `AuthMiddleware`, so
/// only a currently valid token gets here.
#[post("")]
pub async fn logout(
    auth: web::Data<AuthService>,
    user: AuthenticatedUser,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Authorization header required".into()))?;

    auth.revoke(token).await?;
    log::info!("User {} (id {}) logged out", user.0.username, user.0.user_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out successfully" })))
}
