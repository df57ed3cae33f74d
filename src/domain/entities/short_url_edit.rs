//! Partial update request for a short URL.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::error::AppError;

/// Partial update for an existing short URL.
///
/// Every field is independently present or absent. Absent fields are left
/// unchanged by [`crate::domain::entities::ShortUrl::apply_edit`].
///
/// Nullable fields use `Option<Option<T>>`:
/// - `None` leaves the current value untouched
/// - `Some(None)` clears it
/// - `Some(Some(v))` sets it
///
/// `do_validate_url` only matters when `long_url` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortUrlEdit {
    pub(crate) long_url: Option<String>,
    pub(crate) valid_since: Option<Option<DateTime<Utc>>>,
    pub(crate) valid_until: Option<Option<DateTime<Utc>>>,
    pub(crate) max_visits: Option<Option<u32>>,
    pub(crate) do_validate_url: bool,
}

/// Raw edit payload as received from a caller, camelCase keyed.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RawShortUrlEdit {
    #[validate(length(min = 1, message = "Long URL cannot be empty"))]
    long_url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    valid_since: Option<Option<DateTime<Utc>>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    valid_until: Option<Option<DateTime<Utc>>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    max_visits: Option<Option<u32>>,

    validate_url: Option<bool>,
}

impl ShortUrlEdit {
    /// An edit that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an edit from raw key/value input.
    ///
    /// Recognised keys: `longUrl`, `validSince`, `validUntil`, `maxVisits`,
    /// `validateUrl`. Dates are RFC 3339 strings. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the input is not an object, a field
    /// has the wrong type, or `longUrl` is empty once trimmed.
    pub fn from_raw_data(data: Value) -> Result<Self, AppError> {
        if !data.is_object() {
            return Err(AppError::bad_request(
                "Short URL edit data must be an object",
                json!({ "received": data }),
            ));
        }

        let mut raw: RawShortUrlEdit = serde_json::from_value(data).map_err(|e| {
            AppError::bad_request(
                "Provided data is not valid",
                json!({ "reason": e.to_string() }),
            )
        })?;
        raw.long_url = raw.long_url.map(|url| url.trim().to_string());
        raw.validate()?;

        Ok(Self {
            long_url: raw.long_url,
            valid_since: raw.valid_since,
            valid_until: raw.valid_until,
            max_visits: raw.max_visits,
            do_validate_url: raw.validate_url.unwrap_or(false),
        })
    }

    /// Sets the new long URL, with surrounding whitespace removed.
    pub fn with_long_url(mut self, long_url: impl Into<String>) -> Self {
        self.long_url = Some(long_url.into().trim().to_string());
        self
    }

    pub fn with_valid_since(mut self, valid_since: Option<DateTime<Utc>>) -> Self {
        self.valid_since = Some(valid_since);
        self
    }

    pub fn with_valid_until(mut self, valid_until: Option<DateTime<Utc>>) -> Self {
        self.valid_until = Some(valid_until);
        self
    }

    pub fn with_max_visits(mut self, max_visits: Option<u32>) -> Self {
        self.max_visits = Some(max_visits);
        self
    }

    pub fn with_url_validation(mut self, do_validate_url: bool) -> Self {
        self.do_validate_url = do_validate_url;
        self
    }

    pub fn long_url(&self) -> Option<&str> {
        self.long_url.as_deref()
    }

    pub fn valid_since(&self) -> Option<Option<DateTime<Utc>>> {
        self.valid_since
    }

    pub fn valid_until(&self) -> Option<Option<DateTime<Utc>>> {
        self.valid_until
    }

    pub fn max_visits(&self) -> Option<Option<u32>> {
        self.max_visits
    }

    pub fn do_validate_url(&self) -> bool {
        self.do_validate_url
    }

    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.long_url.is_none()
            && self.valid_since.is_none()
            && self.valid_until.is_none()
            && self.max_visits.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_raw_data_all_fields() {
        let edit = ShortUrlEdit::from_raw_data(json!({
            "longUrl": "https://example.com/new",
            "validSince": "2017-01-01T00:00:00+00:00",
            "validUntil": "2017-01-05T00:00:00Z",
            "maxVisits": 5,
            "validateUrl": true,
        }))
        .unwrap();

        assert_eq!(edit.long_url(), Some("https://example.com/new"));
        assert_eq!(
            edit.valid_since(),
            Some(Some(Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap()))
        );
        assert_eq!(
            edit.valid_until(),
            Some(Some(Utc.with_ymd_and_hms(2017, 1, 5, 0, 0, 0).unwrap()))
        );
        assert_eq!(edit.max_visits(), Some(Some(5)));
        assert!(edit.do_validate_url());
    }

    #[test]
    fn test_from_raw_data_distinguishes_absent_from_null() {
        let edit = ShortUrlEdit::from_raw_data(json!({
            "validSince": null,
            "maxVisits": null,
        }))
        .unwrap();

        assert_eq!(edit.valid_since(), Some(None));
        assert_eq!(edit.max_visits(), Some(None));
        assert_eq!(edit.valid_until(), None);
        assert_eq!(edit.long_url(), None);
        assert!(!edit.is_empty());
    }

    #[test]
    fn test_from_raw_data_empty_object() {
        let edit = ShortUrlEdit::from_raw_data(json!({})).unwrap();

        assert!(edit.is_empty());
        assert!(!edit.do_validate_url());
        assert_eq!(edit, ShortUrlEdit::new());
    }

    #[test]
    fn test_from_raw_data_ignores_unknown_keys() {
        let edit = ShortUrlEdit::from_raw_data(json!({ "shortCode": "other" })).unwrap();
        assert!(edit.is_empty());
    }

    #[test]
    fn test_from_raw_data_validate_flag_without_long_url() {
        let edit = ShortUrlEdit::from_raw_data(json!({ "validateUrl": true })).unwrap();

        assert!(edit.do_validate_url());
        assert!(edit.is_empty());
    }

    #[test]
    fn test_from_raw_data_rejects_empty_long_url() {
        let result = ShortUrlEdit::from_raw_data(json!({ "longUrl": "" }));
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_from_raw_data_trims_long_url() {
        let edit = ShortUrlEdit::from_raw_data(json!({ "longUrl": "  https://b.com\n" })).unwrap();
        assert_eq!(edit.long_url(), Some("https://b.com"));

        let blank = ShortUrlEdit::from_raw_data(json!({ "longUrl": " \t " }));
        assert!(matches!(blank.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_from_raw_data_rejects_invalid_date() {
        let result = ShortUrlEdit::from_raw_data(json!({ "validSince": "not-a-date" }));
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_from_raw_data_rejects_negative_max_visits() {
        let result = ShortUrlEdit::from_raw_data(json!({ "maxVisits": -1 }));
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_from_raw_data_rejects_non_object() {
        let result = ShortUrlEdit::from_raw_data(json!(["longUrl"]));
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_builder_sets_fields() {
        let edit = ShortUrlEdit::new()
            .with_long_url("https://example.com")
            .with_url_validation(true)
            .with_max_visits(None);

        assert_eq!(edit.long_url(), Some("https://example.com"));
        assert!(edit.do_validate_url());
        assert_eq!(edit.max_visits(), Some(None));
        assert_eq!(edit.valid_since(), None);
    }
}
