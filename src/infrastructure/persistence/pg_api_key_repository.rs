//! PostgreSQL implementation of the API key repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ApiKey;
use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ApiKeyRow {
    id: i64,
    name: String,
    key_hash: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    revoked_at: Option<DateTime<Utc>>,
    restricted: bool,
}

impl From<ApiKeyRow> for ApiKey {
    fn from(row: ApiKeyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            key_hash: row.key_hash,
            created_at: row.created_at,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
            restricted: row.restricted,
        }
    }
}

const API_KEY_COLUMNS: &str =
    "id, name, key_hash, created_at, expires_at, revoked_at, restricted";

/// PostgreSQL repository for API key storage and lookup.
///
/// Stores HMAC-SHA256 hashes only. Raw keys are never persisted.
pub struct PgApiKeyRepository {
    pool: Arc<PgPool>,
}

impl PgApiKeyRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn find_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(&format!(
            r#"
            SELECT {API_KEY_COLUMNS}
            FROM api_keys
            WHERE key_hash = $1
              AND revoked_at IS NULL
              AND (expires_at IS NULL OR expires_at > NOW())
            "#
        ))
        .bind(key_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ApiKey::from))
    }

    async fn update_last_used(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE api_keys
            SET last_used_at = NOW()
            WHERE id = $1
              AND revoked_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn create(
        &self,
        name: &str,
        key_hash: &str,
        restricted: bool,
    ) -> Result<ApiKey, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(&format!(
            r#"
            INSERT INTO api_keys (name, key_hash, restricted)
            VALUES ($1, $2, $3)
            RETURNING {API_KEY_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(key_hash)
        .bind(restricted)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<ApiKey>, AppError> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ApiKey::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiKey>, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ApiKey::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiKey>, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ApiKey::from))
    }

    async fn revoke(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE api_keys
            SET revoked_at = NOW()
            WHERE id = $1
              AND revoked_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
