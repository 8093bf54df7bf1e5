#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use taskgate::auth::{AuthResponse, AuthService, AuthSettings};
use taskgate::routes;
use taskgate::store::memory::{MemoryTaskStore, MemoryTokenCache, MemoryUserStore};
use taskgate::tasks::TaskService;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123!";
/// Cheapest cost bcrypt accepts; keeps registration fast in tests.
pub const TEST_COST: u32 = 4;

/// Services backed by in-memory stores, shared by every request of one test.
pub struct TestState {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskService>,
    pub cache: Arc<MemoryTokenCache>,
}

impl TestState {
    pub fn new() -> Self {
        Self::with_secret(Some(SECRET))
    }

    pub fn with_secret(secret: Option<&str>) -> Self {
        let cache = Arc::new(MemoryTokenCache::new());
        let auth = AuthService::new(
            Arc::new(MemoryUserStore::new()),
            cache.clone(),
            AuthSettings {
                secret: secret.map(str::to_string),
                token_lifetime: chrono::Duration::hours(24),
                bcrypt_cost: TEST_COST,
            },
        );
        Self {
            auth: web::Data::new(auth),
            tasks: web::Data::new(TaskService::new(Arc::new(MemoryTaskStore::new()))),
            cache,
        }
    }
}

pub async fn init_app(
    state: &TestState,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(state.auth.clone())
            .app_data(state.tasks.clone())
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

/// Sends a request and returns the status plus the JSON body (`Null` when empty).
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: test::TestRequest,
) -> (actix_web::http::StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers `username` and logs in, returning the token.
pub async fn register_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> String {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, 201, "register failed: {}", body);

    login(app, username).await
}

pub async fn login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> String {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, 200, "login failed: {}", body);

    let auth: AuthResponse = serde_json::from_value(body).expect("login response shape");
    auth.token
}
