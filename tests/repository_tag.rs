mod common;

use short_url_manager::domain::repositories::TagRepository;
use short_url_manager::infrastructure::persistence::PgTagRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_find_by_name_missing(pool: PgPool) {
    let repo = PgTagRepository::new(Arc::new(pool));

    let tag = repo.find_by_name("missing").await.unwrap();

    assert!(tag.is_none());
}

#[sqlx::test]
async fn test_find_by_name_existing(pool: PgPool) {
    let id = common::create_short_url(&pool, "abc", "https://example.com", None, None).await;
    common::tag_short_url(&pool, id, &["rust"]).await;
    let repo = PgTagRepository::new(Arc::new(pool));

    let found = repo.find_by_name("rust").await.unwrap().unwrap();

    assert_eq!(found.name(), "rust");
}

#[sqlx::test]
async fn test_names_are_case_sensitive(pool: PgPool) {
    let id = common::create_short_url(&pool, "abc", "https://example.com", None, None).await;
    common::tag_short_url(&pool, id, &["Rust"]).await;
    let repo = PgTagRepository::new(Arc::new(pool));

    assert!(repo.find_by_name("rust").await.unwrap().is_none());
}
