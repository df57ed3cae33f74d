//! Short URL entity and the in-place edit rules applied to it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{ShortUrlEdit, Tag};

/// A minted short URL with its mutable metadata.
///
/// The short code and domain are fixed at creation time. Everything else can be
/// changed through [`ShortUrl::apply_edit`] and [`ShortUrl::set_tags`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub id: i64,
    short_code: String,
    domain: Option<String>,
    long_url: String,
    created_at: DateTime<Utc>,
    valid_since: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
    max_visits: Option<u32>,
    tags: BTreeSet<Tag>,
    /// API key that created this short URL. `None` for legacy/unrestricted rows.
    author_api_key_id: Option<i64>,
}

impl ShortUrl {
    /// Creates a short URL with no validity window, visit cap or tags.
    pub fn new(
        id: i64,
        short_code: impl Into<String>,
        long_url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code: short_code.into(),
            domain: None,
            long_url: long_url.into(),
            created_at,
            valid_since: None,
            valid_until: None,
            max_visits: None,
            tags: BTreeSet::new(),
            author_api_key_id: None,
        }
    }

    pub fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_author(mut self, author_api_key_id: Option<i64>) -> Self {
        self.author_api_key_id = author_api_key_id;
        self
    }

    pub fn with_validity(
        mut self,
        valid_since: Option<DateTime<Utc>>,
        valid_until: Option<DateTime<Utc>>,
    ) -> Self {
        self.valid_since = valid_since;
        self.valid_until = valid_until;
        self
    }

    pub fn with_max_visits(mut self, max_visits: Option<u32>) -> Self {
        self.max_visits = max_visits;
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.set_tags(tags);
        self
    }

    pub fn short_code(&self) -> &str {
        &self.short_code
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn long_url(&self) -> &str {
        &self.long_url
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn valid_since(&self) -> Option<DateTime<Utc>> {
        self.valid_since
    }

    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.valid_until
    }

    pub fn max_visits(&self) -> Option<u32> {
        self.max_visits
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Tag names in ascending order.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn author_api_key_id(&self) -> Option<i64> {
        self.author_api_key_id
    }

    /// Replaces the whole tag set. Tags with the same name collapse into one.
    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = Tag>) {
        self.tags = tags.into_iter().collect();
    }

    /// Applies a partial edit.
    ///
    /// Fields absent from the edit keep their current value. Present fields are
    /// written as-is, including explicit `None` for the nullable ones.
    pub fn apply_edit(&mut self, edit: ShortUrlEdit) {
        let ShortUrlEdit {
            long_url,
            valid_since,
            valid_until,
            max_visits,
            ..
        } = edit;

        if let Some(long_url) = long_url {
            self.long_url = long_url;
        }
        if let Some(valid_since) = valid_since {
            self.valid_since = valid_since;
        }
        if let Some(valid_until) = valid_until {
            self.valid_until = valid_until;
        }
        if let Some(max_visits) = max_visits {
            self.max_visits = max_visits;
        }
    }
}
