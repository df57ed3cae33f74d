//! Listing parameters and paginated results for short URLs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::error::AppError;

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;
pub const MAX_ITEMS_PER_PAGE: u32 = 1000;

/// Column a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    ShortCode,
    LongUrl,
    DateCreated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Sort order for listings, written as `field-DIR` (e.g. `longUrl-DESC`).
///
/// The direction defaults to ascending when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortUrlsOrdering {
    pub field: OrderField,
    pub direction: OrderDirection,
}

impl Default for ShortUrlsOrdering {
    fn default() -> Self {
        Self {
            field: OrderField::DateCreated,
            direction: OrderDirection::Asc,
        }
    }
}

impl FromStr for ShortUrlsOrdering {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s.split_once('-').unwrap_or((s, "ASC"));

        let field = match field {
            "shortCode" => OrderField::ShortCode,
            "longUrl" => OrderField::LongUrl,
            "dateCreated" => OrderField::DateCreated,
            other => {
                return Err(AppError::bad_request(
                    "Invalid order field",
                    json!({ "field": other, "allowed": ["shortCode", "longUrl", "dateCreated"] }),
                ));
            }
        };

        let direction = match direction.to_ascii_uppercase().as_str() {
            "ASC" => OrderDirection::Asc,
            "DESC" => OrderDirection::Desc,
            _ => {
                return Err(AppError::bad_request(
                    "Invalid order direction",
                    json!({ "direction": direction, "allowed": ["ASC", "DESC"] }),
                ));
            }
        };

        Ok(Self { field, direction })
    }
}

impl fmt::Display for ShortUrlsOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            OrderField::ShortCode => "shortCode",
            OrderField::LongUrl => "longUrl",
            OrderField::DateCreated => "dateCreated",
        };
        let direction = match self.direction {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        };
        write!(f, "{field}-{direction}")
    }
}

/// Creation-date range filter. Both bounds are inclusive and optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Filters, ordering and pagination for short URL listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrlsParams {
    pub page: u32,
    /// `None` returns every matching row on a single page.
    pub items_per_page: Option<u32>,
    pub search_term: Option<String>,
    /// Matches short URLs carrying any of these tags.
    pub tags: Vec<String>,
    pub date_range: DateRange,
    pub order_by: ShortUrlsOrdering,
}

impl Default for ShortUrlsParams {
    fn default() -> Self {
        Self {
            page: 1,
            items_per_page: Some(DEFAULT_ITEMS_PER_PAGE),
            search_term: None,
            tags: Vec::new(),
            date_range: DateRange::default(),
            order_by: ShortUrlsOrdering::default(),
        }
    }
}

impl ShortUrlsParams {
    /// Validates pagination and converts it to a database `(offset, limit)` pair.
    ///
    /// Returns `Ok(None)` when every row is requested.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the page is 0 or the page size is
    /// outside `1..=1000`.
    pub fn validate_and_get_offset_limit(&self) -> Result<Option<(i64, i64)>, AppError> {
        if self.page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": self.page }),
            ));
        }

        let Some(items_per_page) = self.items_per_page else {
            return Ok(None);
        };

        if !(1..=MAX_ITEMS_PER_PAGE).contains(&items_per_page) {
            return Err(AppError::bad_request(
                "Items per page must be between 1 and 1000",
                json!({ "items_per_page": items_per_page }),
            ));
        }

        let offset = i64::from(self.page - 1) * i64::from(items_per_page);
        Ok(Some((offset, i64::from(items_per_page))))
    }

    /// Search term with surrounding whitespace removed, if non-empty.
    pub fn normalized_search_term(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One page of results plus the total number of matching items.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    total_items: u64,
    current_page: u32,
    items_per_page: Option<u32>,
}

impl<T> Paginator<T> {
    pub fn new(
        items: Vec<T>,
        total_items: u64,
        current_page: u32,
        items_per_page: Option<u32>,
    ) -> Self {
        Self {
            items,
            total_items,
            current_page,
            items_per_page,
        }
    }

    pub fn current_page_results(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn items_per_page(&self) -> Option<u32> {
        self.items_per_page
    }

    /// Number of items on the current page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of pages. Always at least 1.
    pub fn page_count(&self) -> u64 {
        match self.items_per_page {
            Some(per_page) if per_page > 0 => self.total_items.div_ceil(u64::from(per_page)).max(1),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: u32, items_per_page: Option<u32>) -> ShortUrlsParams {
        ShortUrlsParams {
            page,
            items_per_page,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let offset_limit = ShortUrlsParams::default()
            .validate_and_get_offset_limit()
            .unwrap();
        assert_eq!(offset_limit, Some((0, 10)));
    }

    #[test]
    fn test_custom_page_and_size() {
        let offset_limit = params(3, Some(50)).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset_limit, Some((100, 50)));
    }

    #[test]
    fn test_all_items() {
        let offset_limit = params(1, None).validate_and_get_offset_limit().unwrap();
        assert!(offset_limit.is_none());
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(params(0, Some(10)).validate_and_get_offset_limit().is_err());
        assert!(params(0, None).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(1, Some(0)).validate_and_get_offset_limit().is_err());
        assert!(params(1, Some(1)).validate_and_get_offset_limit().is_ok());
        assert!(params(1, Some(1000)).validate_and_get_offset_limit().is_ok());
        assert!(params(1, Some(1001)).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_normalized_search_term() {
        let mut p = ShortUrlsParams::default();
        assert!(p.normalized_search_term().is_none());

        p.search_term = Some("   ".to_string());
        assert!(p.normalized_search_term().is_none());

        p.search_term = Some("  rust ".to_string());
        assert_eq!(p.normalized_search_term(), Some("rust"));
    }

    #[test]
    fn test_parse_ordering() {
        let ordering: ShortUrlsOrdering = "longUrl-DESC".parse().unwrap();
        assert_eq!(ordering.field, OrderField::LongUrl);
        assert_eq!(ordering.direction, OrderDirection::Desc);

        let ordering: ShortUrlsOrdering = "shortCode".parse().unwrap();
        assert_eq!(ordering.field, OrderField::ShortCode);
        assert_eq!(ordering.direction, OrderDirection::Asc);

        let ordering: ShortUrlsOrdering = "dateCreated-desc".parse().unwrap();
        assert_eq!(ordering.to_string(), "dateCreated-DESC");
    }

    #[test]
    fn test_parse_ordering_rejects_unknown_values() {
        assert!("visits-ASC".parse::<ShortUrlsOrdering>().is_err());
        assert!("longUrl-UP".parse::<ShortUrlsOrdering>().is_err());
    }

    #[test]
    fn test_paginator_page_count() {
        let paginator = Paginator::new(vec![1, 2, 3], 23, 1, Some(10));
        assert_eq!(paginator.page_count(), 3);
        assert_eq!(paginator.len(), 3);
        assert_eq!(paginator.total_items(), 23);

        let empty: Paginator<i32> = Paginator::new(vec![], 0, 1, Some(10));
        assert_eq!(empty.page_count(), 1);
        assert!(empty.is_empty());

        let all = Paginator::new(vec![1, 2], 2, 1, None);
        assert_eq!(all.page_count(), 1);
    }
}
