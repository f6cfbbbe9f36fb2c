//! Shared HTTP client construction and fixed-delay retry

use crate::config::HttpSettings;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Build the client used by every request of a run.
///
/// Every request carries both a connect and an overall deadline, so a stalled
/// server surfaces as a transport error instead of hanging a batch slot.
pub fn build_client(settings: &HttpSettings) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(settings.connect_timeout())
        .timeout(settings.request_timeout())
        .user_agent(&settings.user_agent)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Fixed attempt count with a constant pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl From<&HttpSettings> for RetryPolicy {
    fn from(settings: &HttpSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            delay: settings.retry_delay(),
        }
    }
}

impl RetryPolicy {
    /// Send a request, retrying transport failures.
    ///
    /// `build` is called once per attempt. Only errors raised while sending
    /// (connect, DNS, timeout) are retried; a request that cannot be built
    /// fails at once. The error of the final attempt is returned.
    pub async fn send<F>(&self, url: &str, build: F) -> reqwest::Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match build().send().await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(url, attempt, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) if e.is_builder() => return Err(e),
                Err(e) => {
                    if attempt >= self.max_attempts {
                        warn!(url, attempt, error = %e, "Request failed after retries");
                        return Err(e);
                    }

                    warn!(url, attempt, error = %e, "Request failed, retrying");
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}
