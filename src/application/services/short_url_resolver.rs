//! Scoped resolution of short codes into short URL entities.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{AccessScope, ShortUrl, ShortUrlIdentifier};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

/// Translates an identifier and an access scope into a concrete short URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlResolver: Send + Sync {
    /// Resolves a short URL visible to the given scope.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortUrlNotFound`] if nothing matches, including when
    /// the short URL exists but belongs to another scope.
    /// Returns [`AppError::Internal`] on database errors.
    async fn resolve_short_url(
        &self,
        identifier: &ShortUrlIdentifier,
        scope: &AccessScope,
    ) -> Result<ShortUrl, AppError>;
}

/// Resolver backed by a [`ShortUrlRepository`].
///
/// The repository applies the scope in its query. The result is checked again
/// with [`AccessScope::allows`] so a store that ignores the scope still cannot
/// leak another owner's short URL.
pub struct ScopedShortUrlResolver<R: ShortUrlRepository> {
    repository: Arc<R>,
}

impl<R: ShortUrlRepository> ScopedShortUrlResolver<R> {
    /// Creates a new resolver.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: ShortUrlRepository> ShortUrlResolver for ScopedShortUrlResolver<R> {
    async fn resolve_short_url(
        &self,
        identifier: &ShortUrlIdentifier,
        scope: &AccessScope,
    ) -> Result<ShortUrl, AppError> {
        let short_url = self
            .repository
            .find_one(identifier, scope)
            .await?
            .filter(|short_url| scope.allows(short_url));

        match short_url {
            Some(short_url) => Ok(short_url),
            None => {
                tracing::debug!(%identifier, ?scope, "Short URL not resolved");
                Err(AppError::short_url_not_found(identifier))
            }
        }
    }
}
