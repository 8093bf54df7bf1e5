use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;

use taskgate::auth::{AuthService, AuthSettings};
use taskgate::config::Config;
use taskgate::store::postgres::{PgTaskStore, PgUserStore};
use taskgate::store::redis_cache::RedisTokenCache;
use taskgate::tasks::TaskService;
use taskgate::{db, routes};

fn fatal<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> io::Error + '_ {
    move |e| {
        log::error!("{}: {}", context, e);
        io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(fatal("Invalid configuration"))?;

    let pool = db::connect(&config.database)
        .await
        .map_err(fatal("Failed to connect to database"))?;
    log::info!("Connected to the database");

    db::migrate(&pool).await.map_err(fatal("Failed to run migrations"))?;
    if config.seed_demo_tasks {
        db::seed_demo_tasks(&pool)
            .await
            .map_err(fatal("Failed to seed demo tasks"))?;
    }

    let cache = RedisTokenCache::new(&config.redis).map_err(fatal("Invalid Redis settings"))?;
    cache.ping().await.map_err(fatal("Failed to connect to Redis"))?;
    log::info!("Connected to Redis at {}:{}", config.redis.host, config.redis.port);

    if config.jwt_secret.is_none() {
        log::warn!("JWT_SECRET is not set; login and protected routes will fail");
    }

    let auth_service = web::Data::new(AuthService::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(cache),
        AuthSettings {
            secret: config.jwt_secret.clone(),
            token_lifetime: chrono::Duration::hours(config.jwt_expiration_hours),
            bcrypt_cost: config.bcrypt_cost,
        },
    ));
    let task_service = web::Data::new(TaskService::new(Arc::new(PgTaskStore::new(pool))));

    log::info!("Starting taskgate server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(auth_service.clone())
            .app_data(task_service.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
