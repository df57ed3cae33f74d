//! Repository trait for short URL data access.

use crate::domain::entities::{AccessScope, ShortUrl, ShortUrlIdentifier, ShortUrlsParams};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short URLs.
///
/// Every read takes an [`AccessScope`] and must never return rows the scope
/// cannot see.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_short_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Finds one short URL by short code and exact domain, within the scope.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortUrl))` if found and visible
    /// - `Ok(None)` if missing or outside the scope
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_one(
        &self,
        identifier: &ShortUrlIdentifier,
        scope: &AccessScope,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Returns the page of short URLs matching the filters, in the requested order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on invalid pagination.
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_list(
        &self,
        params: &ShortUrlsParams,
        scope: &AccessScope,
    ) -> Result<Vec<ShortUrl>, AppError>;

    /// Counts every short URL matching the filters, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_list(
        &self,
        params: &ShortUrlsParams,
        scope: &AccessScope,
    ) -> Result<u64, AppError>;

    /// Persists the mutable state of a short URL and commits it.
    ///
    /// Writes the long URL, validity window and visit cap, creates any tag
    /// name not stored yet, and replaces the stored tag links with exactly the
    /// entity's tag set. All of it happens in one transaction, so a failure
    /// leaves neither the row nor new tags behind.
    ///
    /// Tag creation is idempotent by name: concurrent saves introducing the
    /// same new tag converge on one stored tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortUrlNotFound`] if the row no longer exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn save(&self, short_url: &ShortUrl) -> Result<(), AppError>;
}
