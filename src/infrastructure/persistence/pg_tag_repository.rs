//! PostgreSQL implementation of the tag repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Tag;
use crate::domain::repositories::TagRepository;
use crate::error::AppError;

/// PostgreSQL repository for tag lookups.
///
/// New tags are inserted by [`super::PgShortUrlRepository`] when the short URL
/// carrying them is saved.
pub struct PgTagRepository {
    pool: Arc<PgPool>,
}

impl PgTagRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, AppError> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(name.map(Tag::new))
    }
}
