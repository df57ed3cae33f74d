//! URL validator performing a format check and an optional HTTP reachability check.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::OnceCell;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use url::Url;

use crate::config::Config;
use crate::domain::UrlValidator;
use crate::error::AppError;
use crate::utils::url_format::check_url_format;

const MAX_REDIRECTS: usize = 15;
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(500);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`UrlValidator`] backed by `reqwest`.
///
/// - `do_validate = false`: only the local format check runs
/// - `do_validate = true`: the URL must also answer a GET (following up to 15
///   redirects) with a non-error status
///
/// Transport failures are retried at a fixed interval up to `max_attempts`
/// times. HTTP error statuses are not retried.
///
/// The HTTP client is built on the first reachability check.
pub struct HttpUrlValidator {
    client: OnceCell<reqwest::Client>,
    timeout: Duration,
    max_attempts: usize,
    retry_interval: Duration,
}

impl HttpUrlValidator {
    /// Creates a validator with the given request timeout and attempt count.
    pub fn new(timeout: Duration, max_attempts: usize) -> Self {
        Self {
            client: OnceCell::new(),
            timeout,
            max_attempts: max_attempts.max(1),
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Creates a validator from `URL_VALIDATION_TIMEOUT` / `URL_VALIDATION_ATTEMPTS`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_secs(config.url_validation_timeout),
            config.url_validation_attempts,
        )
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    async fn client(&self) -> Result<&reqwest::Client, AppError> {
        self.client
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
                    .user_agent(USER_AGENT)
                    .build()
            })
            .await
            .map_err(|e| {
                AppError::internal(
                    "Failed to build HTTP client",
                    json!({ "reason": e.to_string() }),
                )
            })
    }

    async fn check_reachable(
        &self,
        client: &reqwest::Client,
        url: &Url,
    ) -> Result<(), reqwest::Error> {
        let strategy = FixedInterval::new(self.retry_interval).take(self.max_attempts - 1);

        RetryIf::start(
            strategy,
            || {
                let request = client.get(url.clone());
                async move {
                    request.send().await?.error_for_status()?;
                    Ok::<(), reqwest::Error>(())
                }
            },
            |e: &reqwest::Error| {
                let transient = !e.is_status();
                if transient {
                    tracing::warn!(url = %url, error = %e, "URL reachability attempt failed");
                }
                transient
            },
        )
        .await
    }
}

#[async_trait]
impl UrlValidator for HttpUrlValidator {
    async fn validate_url(&self, url: &str, do_validate: bool) -> Result<(), AppError> {
        let parsed = check_url_format(url).map_err(|e| AppError::invalid_url(url, e.to_string()))?;

        if !do_validate {
            return Ok(());
        }

        let client = self.client().await?;
        self.check_reachable(client, &parsed).await.map_err(|e| {
            tracing::debug!(url, error = %e, "URL reachability check failed");
            AppError::invalid_url(url, e.to_string())
        })
    }
}
