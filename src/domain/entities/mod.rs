//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortUrl`] - A minted short URL and its mutable metadata
//! - [`Tag`] - A label, identified by name
//! - [`ApiKey`] - A stored API key and the [`AccessScope`] it grants
//!
//! # Request Types
//!
//! - [`ShortUrlIdentifier`] - Short code plus optional domain
//! - [`ShortUrlEdit`] - Partial update with absent / null / value semantics
//! - [`ShortUrlsParams`] - Listing filters, ordering and pagination
//! - [`Paginator`] - A page of results with the total count

pub mod api_key;
pub mod listing;
pub mod short_url;
pub mod short_url_edit;
pub mod short_url_identifier;
pub mod tag;

pub use api_key::{AccessScope, ApiKey};
pub use listing::{
    DateRange, OrderDirection, OrderField, Paginator, ShortUrlsOrdering, ShortUrlsParams,
};
pub use short_url::ShortUrl;
pub use short_url_edit::ShortUrlEdit;
pub use short_url_identifier::ShortUrlIdentifier;
pub use tag::Tag;
