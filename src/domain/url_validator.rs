//! URL validation contract.

use crate::error::AppError;
use async_trait::async_trait;

/// Validates long URLs before they are written to a short URL.
///
/// # Implementations
///
/// - [`crate::infrastructure::validation::HttpUrlValidator`] - format check plus HTTP reachability
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlValidator: Send + Sync {
    /// Checks a URL.
    ///
    /// When `do_validate` is false only cheap local checks are allowed. When it
    /// is true the implementation may also verify the URL is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL does not pass.
    async fn validate_url(&self, url: &str, do_validate: bool) -> Result<(), AppError>;
}
