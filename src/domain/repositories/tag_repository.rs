//! Repository trait for tags.

use crate::domain::entities::Tag;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for tags.
///
/// Tags are unique by name. Only lookups go through this trait: names that do
/// not exist yet are written by [`crate::domain::repositories::ShortUrlRepository::save`]
/// in the same transaction as the short URL that carries them.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTagRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Finds a tag by its exact name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, AppError>;
}
