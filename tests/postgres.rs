//! Store tests against a live database. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use dotenv::dotenv;
use pretty_assertions::assert_eq;
use sqlx::PgPool;

use taskgate::db;
use taskgate::models::{Page, TaskFilter, TaskInput};
use taskgate::store::postgres::{PgTaskStore, PgUserStore};
use taskgate::store::{TaskStore, UserStore};
use taskgate::AppError;

async fn pool() -> PgPool {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    db::migrate(&pool).await.expect("migrations");
    pool
}

fn input(title: &str, description: &str, status: &str) -> TaskInput {
    TaskInput {
        title: title.into(),
        description: description.into(),
        status: status.into(),
        due_date: None,
    }
}

#[ignore]
#[actix_rt::test]
async fn test_duplicate_username_is_rejected() {
    let pool = pool().await;
    let store = PgUserStore::new(pool.clone());
    let username = format!("pg_{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);

    let user = store.create(&username, "hash").await.unwrap();
    assert_eq!(user.username, username);

    match store.create(&username, "other").await {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Username already taken"),
        other => panic!("expected BadRequest, got {:?}", other),
    }

    let found = store.find_by_username(&username).await.unwrap().unwrap();
    assert_eq!(found.password_hash, "hash");

    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(&username)
        .execute(&pool)
        .await;
}

#[ignore]
#[actix_rt::test]
async fn test_task_store_filters_and_wildcards() {
    let pool = pool().await;
    let store = PgTaskStore::new(pool.clone());
    let marker = uuid::Uuid::new_v4().simple().to_string();

    let a = store
        .create(&input(&format!("{} 100% done", marker), "", "completed"))
        .await
        .unwrap();
    let b = store
        .create(&input(&format!("{} 1000 done", marker), "", "pending"))
        .await
        .unwrap();
    let c = store
        .create(&input("unrelated", &format!("notes {}", marker.to_uppercase()), "pending"))
        .await
        .unwrap();

    let by_marker = TaskFilter::new(None, Some(marker.clone()));
    assert_eq!(store.count(&by_marker).await.unwrap(), 3);
    let ids: Vec<i64> = store
        .list(&by_marker, Page::new(None, None))
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);

    // `%` is matched literally.
    let literal = TaskFilter::new(None, Some(format!("{} 100%", marker)));
    assert_eq!(store.count(&literal).await.unwrap(), 1);

    let pending = TaskFilter::new(Some("pending".into()), Some(marker.clone()));
    assert_eq!(store.count(&pending).await.unwrap(), 2);

    let second = store.list(&by_marker, Page::new(Some(2), Some(2))).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, a.id);

    let updated = store
        .update(b.id, &input("renamed", "", "completed"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.created_at, b.created_at);
    assert_eq!(updated.status, "completed");

    for id in [a.id, b.id, c.id] {
        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.get(id).await.unwrap().is_none());
    }
    assert!(store.update(a.id, &input("x", "", "pending")).await.unwrap().is_none());
}
