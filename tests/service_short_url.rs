mod common;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use short_url_manager::application::services::{
    AuthService, ShortUrlResolver, ShortUrlService, hash_api_key,
};
use short_url_manager::domain::entities::{
    AccessScope, ShortUrl, ShortUrlEdit, ShortUrlIdentifier, ShortUrlsParams,
};
use short_url_manager::domain::repositories::ApiKeyRepository;
use short_url_manager::error::AppError;
use short_url_manager::infrastructure::persistence::{PgShortUrlRepository, PgTagRepository};
use short_url_manager::infrastructure::validation::HttpUrlValidator;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Resolves every identifier to a short URL whose row was deleted meanwhile.
struct DeletedRowResolver;

#[async_trait]
impl ShortUrlResolver for DeletedRowResolver {
    async fn resolve_short_url(
        &self,
        identifier: &ShortUrlIdentifier,
        _scope: &AccessScope,
    ) -> Result<ShortUrl, AppError> {
        Ok(ShortUrl::new(
            9999,
            identifier.short_code(),
            "https://example.com",
            Utc::now(),
        ))
    }
}

#[sqlx::test]
async fn test_set_tags_creates_missing_tags_once(pool: PgPool) {
    common::create_short_url(&pool, "abc123", "https://example.com", None, None).await;
    let service = common::create_short_url_service(pool.clone());
    let identifier = ShortUrlIdentifier::from_short_code("abc123");

    let tags = vec![
        "foo".to_string(),
        " bar ".to_string(),
        "foo".to_string(),
        "".to_string(),
    ];
    let short_url = service
        .set_tags_by_short_code(&identifier, &tags, &AccessScope::Unrestricted)
        .await
        .unwrap();

    assert_eq!(short_url.tag_names(), vec!["bar", "foo"]);
    assert_eq!(common::count_tags(&pool).await, 2);

    let replaced = service
        .set_tags_by_short_code(&identifier, &["foo".to_string()], &AccessScope::Unrestricted)
        .await
        .unwrap();

    assert_eq!(replaced.tag_names(), vec!["foo"]);
    // Unlinked tags are kept in the tag table.
    assert_eq!(common::count_tags(&pool).await, 2);
}

#[sqlx::test]
async fn test_set_tags_with_empty_list_clears_tags(pool: PgPool) {
    let id = common::create_short_url(&pool, "abc123", "https://example.com", None, None).await;
    common::tag_short_url(&pool, id, &["foo", "bar"]).await;
    let service = common::create_short_url_service(pool.clone());

    let short_url = service
        .set_tags_by_short_code(
            &ShortUrlIdentifier::from_short_code("abc123"),
            &[],
            &AccessScope::Unrestricted,
        )
        .await
        .unwrap();

    assert!(short_url.tags().is_empty());

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls_in_tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);
}

#[sqlx::test]
async fn test_update_metadata_partial_edit(pool: PgPool) {
    common::create_short_url(&pool, "abc123", "https://example.com", None, None).await;
    let service = common::create_short_url_service(pool.clone());
    let identifier = ShortUrlIdentifier::from_short_code("abc123");

    let edit = ShortUrlEdit::from_raw_data(json!({
        "maxVisits": 5,
        "validUntil": "2030-01-01T00:00:00Z",
    }))
    .unwrap();
    service
        .update_metadata_by_short_code(&identifier, edit, &AccessScope::Unrestricted)
        .await
        .unwrap();

    let clear = ShortUrlEdit::from_raw_data(json!({ "maxVisits": null })).unwrap();
    let updated = service
        .update_metadata_by_short_code(&identifier, clear, &AccessScope::Unrestricted)
        .await
        .unwrap();

    assert_eq!(updated.max_visits(), None);
    assert!(updated.valid_until().is_some());
    assert_eq!(updated.long_url(), "https://example.com");

    let page = service
        .list_short_urls(&ShortUrlsParams::default(), &AccessScope::Unrestricted)
        .await
        .unwrap();
    let stored = &page.current_page_results()[0];
    assert_eq!(stored.max_visits(), None);
    assert_eq!(stored.valid_until(), updated.valid_until());
}

#[sqlx::test]
async fn test_update_metadata_rejects_malformed_long_url(pool: PgPool) {
    common::create_short_url(&pool, "abc123", "https://example.com", None, None).await;
    let service = common::create_short_url_service(pool.clone());
    let identifier = ShortUrlIdentifier::from_short_code("abc123");

    let edit = ShortUrlEdit::from_raw_data(json!({
        "longUrl": "not a url",
        "maxVisits": 3,
    }))
    .unwrap();
    let result = service
        .update_metadata_by_short_code(&identifier, edit, &AccessScope::Unrestricted)
        .await;

    assert!(matches!(result, Err(AppError::InvalidUrl { .. })));

    let max_visits: Option<i64> =
        sqlx::query_scalar("SELECT max_visits FROM short_urls WHERE short_code = 'abc123'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(max_visits, None);
}

#[sqlx::test]
async fn test_restricted_key_cannot_touch_foreign_short_url(pool: PgPool) {
    let secret = "test-secret";
    let keys = Arc::new(common::create_api_key_repository(pool.clone()));
    let restricted = keys
        .create("restricted", &hash_api_key(secret, "raw-restricted"), true)
        .await
        .unwrap();
    common::create_short_url(&pool, "mine", "https://a.com", None, Some(restricted.id)).await;
    common::create_short_url(&pool, "theirs", "https://b.com", None, None).await;

    let auth = AuthService::new(keys, secret.to_string());
    let scope = auth.resolve_scope(Some("raw-restricted")).await.unwrap();
    assert_eq!(scope, AccessScope::ScopedToOwner(restricted.id));

    let service = common::create_short_url_service(pool.clone());

    let result = service
        .set_tags_by_short_code(
            &ShortUrlIdentifier::from_short_code("theirs"),
            &["x".to_string()],
            &scope,
        )
        .await;
    assert!(matches!(result, Err(AppError::ShortUrlNotFound { .. })));
    assert_eq!(common::count_tags(&pool).await, 0);

    let page = service
        .list_short_urls(&ShortUrlsParams::default(), &scope)
        .await
        .unwrap();
    assert_eq!(page.total_items(), 1);
    assert_eq!(page.current_page_results()[0].short_code(), "mine");
}

#[sqlx::test]
async fn test_unknown_api_key_is_unauthorized(pool: PgPool) {
    let auth = AuthService::new(
        Arc::new(common::create_api_key_repository(pool)),
        "test-secret".to_string(),
    );

    let result = auth.resolve_scope(Some("nope")).await;

    assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    assert_eq!(
        auth.resolve_scope(None).await.unwrap(),
        AccessScope::Unrestricted
    );
}

#[sqlx::test]
async fn test_set_tags_on_deleted_row_creates_no_tags(pool: PgPool) {
    let pool = Arc::new(pool);
    let service = ShortUrlService::new(
        Arc::new(PgShortUrlRepository::new(pool.clone())),
        Arc::new(PgTagRepository::new(pool.clone())),
        Arc::new(DeletedRowResolver),
        Arc::new(HttpUrlValidator::new(Duration::from_secs(2), 1)),
    );

    let result = service
        .set_tags_by_short_code(
            &ShortUrlIdentifier::from_short_code("gone"),
            &["bar".to_string()],
            &AccessScope::Unrestricted,
        )
        .await;

    assert!(matches!(result, Err(AppError::ShortUrlNotFound { .. })));
    assert_eq!(common::count_tags(&pool).await, 0);
}

#[sqlx::test]
async fn test_empty_edit_still_resolves_short_code(pool: PgPool) {
    common::create_short_url(&pool, "abc123", "https://example.com", None, None).await;
    let service = common::create_short_url_service(pool.clone());

    let missing = service
        .update_metadata_by_short_code(
            &ShortUrlIdentifier::from_short_code("does-not-exist"),
            ShortUrlEdit::from_raw_data(json!({})).unwrap(),
            &AccessScope::Unrestricted,
        )
        .await;
    assert!(matches!(missing, Err(AppError::ShortUrlNotFound { .. })));

    let unchanged = service
        .update_metadata_by_short_code(
            &ShortUrlIdentifier::from_short_code("abc123"),
            ShortUrlEdit::from_raw_data(json!({})).unwrap(),
            &AccessScope::Unrestricted,
        )
        .await
        .unwrap();
    assert_eq!(unchanged.long_url(), "https://example.com");
}

#[sqlx::test]
async fn test_empty_edit_respects_scope(pool: PgPool) {
    let owner = common::create_api_key(&pool, "owner", true).await;
    common::create_short_url(&pool, "theirs", "https://b.com", None, None).await;
    let service = common::create_short_url_service(pool.clone());

    let result = service
        .update_metadata_by_short_code(
            &ShortUrlIdentifier::from_short_code("theirs"),
            ShortUrlEdit::from_raw_data(json!({})).unwrap(),
            &AccessScope::ScopedToOwner(owner),
        )
        .await;

    assert!(matches!(result, Err(AppError::ShortUrlNotFound { .. })));
}
