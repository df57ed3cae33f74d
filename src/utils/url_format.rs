//! Cheap local well-formedness checks for long URLs.

use url::Url;

/// Reasons a long URL fails the local format check.
#[derive(Debug, thiserror::Error)]
pub enum UrlFormatError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL must not have surrounding whitespace")]
    SurroundingWhitespace,
}

/// Parses a long URL and checks it is an absolute `http`/`https` URL with a host.
///
/// No network access happens here.
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
///
/// # Errors
///
/// Returns [`UrlFormatError::InvalidFormat`] for malformed or relative URLs.
/// Returns [`UrlFormatError::UnsupportedProtocol`] for non-HTTP(S) schemes.
/// Returns [`UrlFormatError::MissingHost`] if the URL has an empty host.
/// Returns [`UrlFormatError::SurroundingWhitespace`] if the input is not trimmed.
pub fn check_url_format(input: &str) -> Result<Url, UrlFormatError> {
    if input.trim() != input {
        return Err(UrlFormatError::SurroundingWhitespace);
    }

    let url = Url::parse(input)
        .map_err(|e| UrlFormatError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlFormatError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlFormatError::MissingHost);
    }

    Ok(url)
}
