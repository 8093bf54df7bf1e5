use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: chrono::DateTime<Utc>,
}

/// Liveness check, outside the auth gate. Does not touch the database or the token cache.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_reports_service_identity() {
        let app = test::init_service(App::new().service(health)).await;

        let before = Utc::now();
        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "taskgate");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

        let stamped: chrono::DateTime<Utc> =
            serde_json::from_value(json["timestamp"].clone()).unwrap();
        assert!(stamped >= before);
    }
}
