//! Application error type shared by every layer.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::entities::ShortUrlIdentifier;

/// Serializable error summary for CLI and log output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// No short URL matches the identifier under the caller's access scope.
    ///
    /// Also returned when the short URL exists but is not visible to the scope.
    #[error("No URL found with short code \"{short_code}\"")]
    ShortUrlNotFound {
        short_code: String,
        domain: Option<String>,
    },

    #[error("Provided URL {url} is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn short_url_not_found(identifier: &ShortUrlIdentifier) -> Self {
        Self::ShortUrlNotFound {
            short_code: identifier.short_code().to_string(),
            domain: identifier.domain().map(str::to_string),
        }
    }
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ShortUrlNotFound { .. } => "short_url_not_found",
            AppError::InvalidUrl { .. } => "invalid_url",
            AppError::Validation { .. } => "validation_error",
            AppError::Unauthorized { .. } => "unauthorized",
            AppError::Conflict { .. } => "conflict",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let details = match self {
            AppError::ShortUrlNotFound { short_code, domain } => {
                json!({ "short_code": short_code, "domain": domain })
            }
            AppError::InvalidUrl { url, reason } => json!({ "url": url, "reason": reason }),
            AppError::Validation { details, .. }
            | AppError::Unauthorized { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::Internal { details, .. } => details.clone(),
        };

        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).unwrap_or(Value::Null);
        AppError::bad_request("Provided data is not valid", details)
    }
}
