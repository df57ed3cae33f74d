#![allow(dead_code)]

use chrono::{DateTime, Utc};
use short_url_manager::application::services::{ScopedShortUrlResolver, ShortUrlService};
use short_url_manager::infrastructure::persistence::{
    PgApiKeyRepository, PgShortUrlRepository, PgTagRepository,
};
use short_url_manager::infrastructure::validation::HttpUrlValidator;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

pub type TestShortUrlService = ShortUrlService<
    PgShortUrlRepository,
    PgTagRepository,
    ScopedShortUrlResolver<PgShortUrlRepository>,
    HttpUrlValidator,
>;

pub async fn create_api_key(pool: &PgPool, name: &str, restricted: bool) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO api_keys (name, key_hash, restricted) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(format!("hash-{name}"))
    .bind(restricted)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_short_url(
    pool: &PgPool,
    code: &str,
    url: &str,
    domain: Option<&str>,
    author: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO short_urls (short_code, original_url, domain, author_api_key_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(code)
    .bind(url)
    .bind(domain)
    .bind(author)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn set_created_at(pool: &PgPool, id: i64, created_at: DateTime<Utc>) {
    sqlx::query("UPDATE short_urls SET created_at = $2 WHERE id = $1")
        .bind(id)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn tag_short_url(pool: &PgPool, short_url_id: i64, tags: &[&str]) {
    for tag in tags {
        sqlx::query(
            r#"
            WITH t AS (
                INSERT INTO tags (name) VALUES ($2)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
            )
            INSERT INTO short_urls_in_tags (short_url_id, tag_id) SELECT $1, id FROM t
            "#,
        )
        .bind(short_url_id)
        .bind(*tag)
        .execute(pool)
        .await
        .unwrap();
    }
}

pub async fn count_tags(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tags")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_short_url_service(pool: PgPool) -> TestShortUrlService {
    let pool = Arc::new(pool);
    let short_url_repository = Arc::new(PgShortUrlRepository::new(pool.clone()));

    ShortUrlService::new(
        short_url_repository.clone(),
        Arc::new(PgTagRepository::new(pool)),
        Arc::new(ScopedShortUrlResolver::new(short_url_repository)),
        Arc::new(HttpUrlValidator::new(Duration::from_secs(2), 1)),
    )
}

pub fn create_api_key_repository(pool: PgPool) -> PgApiKeyRepository {
    PgApiKeyRepository::new(Arc::new(pool))
}
