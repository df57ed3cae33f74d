//! Short URL listing, tagging and metadata editing.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::services::short_url_resolver::ShortUrlResolver;
use crate::domain::UrlValidator;
use crate::domain::entities::{
    AccessScope, Paginator, ShortUrl, ShortUrlEdit, ShortUrlIdentifier, ShortUrlsParams, Tag,
};
use crate::domain::repositories::{ShortUrlRepository, TagRepository};
use crate::error::AppError;

/// Service orchestrating every operation on existing short URLs.
///
/// Lookups always go through the [`ShortUrlResolver`] so the caller's
/// [`AccessScope`] is applied. The service owns the commit after mutating the
/// resolved entity.
pub struct ShortUrlService<R, T, S, V>
where
    R: ShortUrlRepository,
    T: TagRepository,
    S: ShortUrlResolver,
    V: UrlValidator,
{
    short_url_repository: Arc<R>,
    tag_repository: Arc<T>,
    resolver: Arc<S>,
    url_validator: Arc<V>,
}

impl<R, T, S, V> ShortUrlService<R, T, S, V>
where
    R: ShortUrlRepository,
    T: TagRepository,
    S: ShortUrlResolver,
    V: UrlValidator,
{
    /// Creates a new short URL service.
    pub fn new(
        short_url_repository: Arc<R>,
        tag_repository: Arc<T>,
        resolver: Arc<S>,
        url_validator: Arc<V>,
    ) -> Self {
        Self {
            short_url_repository,
            tag_repository,
            resolver,
            url_validator,
        }
    }

    /// Lists short URLs visible to the scope.
    ///
    /// The page and the total count come from two separate repository calls.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on invalid pagination.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_short_urls(
        &self,
        params: &ShortUrlsParams,
        scope: &AccessScope,
    ) -> Result<Paginator<ShortUrl>, AppError> {
        params.validate_and_get_offset_limit()?;

        let items = self.short_url_repository.find_list(params, scope).await?;
        let total = self.short_url_repository.count_list(params, scope).await?;

        tracing::debug!(
            page = params.page,
            items = items.len(),
            total,
            "Listed short URLs"
        );

        Ok(Paginator::new(
            items,
            total,
            params.page,
            params.items_per_page,
        ))
    }

    /// Replaces the tags of a short URL with exactly the given names.
    ///
    /// Each distinct name is looked up; missing names become new tags that are
    /// stored by the same commit as the short URL. Blank names are skipped.
    /// Previous tags not in the list are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortUrlNotFound`] if the short URL is not visible.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn set_tags_by_short_code(
        &self,
        identifier: &ShortUrlIdentifier,
        tag_names: &[String],
        scope: &AccessScope,
    ) -> Result<ShortUrl, AppError> {
        let mut short_url = self.resolver.resolve_short_url(identifier, scope).await?;

        let names: BTreeSet<&str> = tag_names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();

        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            tags.push(self.find_or_create_tag(name).await?);
        }

        short_url.set_tags(tags);
        self.short_url_repository.save(&short_url).await?;

        tracing::info!(
            %identifier,
            tags = ?short_url.tag_names(),
            "Short URL tags replaced"
        );

        Ok(short_url)
    }

    /// Applies a partial edit to a short URL and commits it.
    ///
    /// The URL validator is called only when the edit carries a new long URL.
    /// A validation failure aborts before anything is merged or persisted.
    /// An edit with no fields is still committed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortUrlNotFound`] if the short URL is not visible.
    /// Returns [`AppError::InvalidUrl`] if the new long URL fails validation.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update_metadata_by_short_code(
        &self,
        identifier: &ShortUrlIdentifier,
        edit: ShortUrlEdit,
        scope: &AccessScope,
    ) -> Result<ShortUrl, AppError> {
        let mut short_url = self.resolver.resolve_short_url(identifier, scope).await?;

        if let Some(long_url) = edit.long_url() {
            self.url_validator
                .validate_url(long_url, edit.do_validate_url())
                .await?;
        }

        short_url.apply_edit(edit);
        self.short_url_repository.save(&short_url).await?;

        tracing::info!(%identifier, "Short URL metadata updated");

        Ok(short_url)
    }

    async fn find_or_create_tag(&self, name: &str) -> Result<Tag, AppError> {
        match self.tag_repository.find_by_name(name).await? {
            Some(tag) => Ok(tag),
            None => {
                tracing::debug!(name, "New tag, stored on commit");
                Ok(Tag::new(name))
            }
        }
    }
}
