//! Exponential-backoff retry with token-refresh-on-expiry.
//!
//! Classification is by string error code so one policy covers every
//! provider. Two disjoint code sets matter: transient codes are retried
//! with capped exponential backoff; token-expiry codes trigger a single
//! refresh-then-replay before the call is given up on.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{codes, AdapterError, AdapterResult};

/// Error codes considered transient and safe to retry.
const RETRYABLE_CODES: &[&str] = &[
    codes::NETWORK_ERROR,
    codes::TIMEOUT,
    codes::RATE_LIMITED,
    codes::SERVER_ERROR,
    "ECONNRESET",
    "ECONNREFUSED",
    "ETIMEDOUT",
    "500",
    "502",
    "503",
    "504",
    "429",
];

/// Error codes signalling an expired or rejected access token.
const TOKEN_EXPIRED_CODES: &[&str] = &[
    codes::TOKEN_EXPIRED,
    "401",
    codes::UNAUTHORIZED,
    codes::INVALID_TOKEN,
];

/// Whether the given error code is transient and worth retrying.
#[must_use]
pub fn is_retryable_code(code: &str) -> bool {
    RETRYABLE_CODES.contains(&code)
}

/// Whether the given error code signals an expired access token.
#[must_use]
pub fn is_token_expired_code(code: &str) -> bool {
    TOKEN_EXPIRED_CODES.contains(&code)
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Maximum delay cap in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with the given max retries and base delay.
    /// The maximum delay cap defaults to 30 seconds.
    #[must_use]
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms: 30_000,
        }
    }

    /// Calculate the backoff delay before the given retry (0-indexed).
    ///
    /// `min(base_delay_ms * 2^retry_count, max_delay_ms)` — no jitter.
    #[must_use]
    pub fn delay_for(&self, retry_count: u32) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(retry_count));
        Duration::from_millis(exponential.min(self.max_delay_ms))
    }
}

/// Future returned by a [`TokenRefresher`].
pub type RefreshFuture = Pin<Box<dyn Future<Output = AdapterResult<()>> + Send>>;

/// Callback that exchanges a refresh token for a new access token.
///
/// Built with [`crate::token::token_refresh_fn`], which binds the
/// connection's refresh token into the closure.
pub type TokenRefresher = Box<dyn Fn() -> RefreshFuture + Send + Sync>;

/// Outcome of driving one operation through the retry policy.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// Final result of the operation.
    pub result: AdapterResult<T>,
    /// Number of backoff retries consumed (0 when the first attempt decided).
    pub retry_count: u32,
    /// Whether the token refresh callback ran successfully during this call.
    pub token_refreshed: bool,
}

impl<T> RetryOutcome<T> {
    /// Whether the operation ultimately succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Final error code, when the operation failed.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.result.as_ref().err().map(|e| e.code.as_str())
    }
}

/// Execute an operation under the retry policy, sleeping with
/// `tokio::time::sleep` between attempts.
///
/// Attempt 0 is the first call, not a retry. A token-expiry failure
/// triggers the refresher (when supplied) at most once per call: on
/// refresh success the operation is replayed immediately without
/// consuming a backoff delay or retry slot; on refresh failure the call
/// stops with [`codes::TOKEN_REFRESH_FAILED`]. Transient failures sleep
/// [`RetryPolicy::delay_for`] and retry until `max_retries` is
/// exhausted; anything else fails immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: F,
    refresher: Option<&TokenRefresher>,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AdapterResult<T>>,
{
    retry_with_backoff_using(policy, operation, refresher, tokio::time::sleep).await
}

/// [`retry_with_backoff`] with an injectable sleep function.
///
/// Tests pass a recording no-op sleeper so the loop runs without
/// wall-clock waits.
pub async fn retry_with_backoff_using<T, F, Fut, S, SFut>(
    policy: &RetryPolicy,
    mut operation: F,
    refresher: Option<&TokenRefresher>,
    sleep: S,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AdapterResult<T>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut retry_count: u32 = 0;
    let mut token_refreshed = false;

    loop {
        match operation().await {
            Ok(value) => {
                if retry_count > 0 {
                    debug!(retries = retry_count, "Operation succeeded after retries");
                }
                return RetryOutcome {
                    result: Ok(value),
                    retry_count,
                    token_refreshed,
                };
            }
            Err(error) => {
                // One refresh-then-replay per call, regardless of how often
                // the token error recurs afterwards.
                if error.is_token_expired() && !token_refreshed {
                    if let Some(refresh) = refresher {
                        debug!(code = %error.code, "Access token rejected, attempting refresh");
                        match refresh().await {
                            Ok(()) => {
                                token_refreshed = true;
                                continue;
                            }
                            Err(refresh_error) => {
                                warn!(error = %refresh_error, "Token refresh failed");
                                return RetryOutcome {
                                    result: Err(AdapterError::new(
                                        codes::TOKEN_REFRESH_FAILED,
                                        format!(
                                            "token refresh failed: {}",
                                            refresh_error.message
                                        ),
                                    )),
                                    retry_count,
                                    token_refreshed: false,
                                };
                            }
                        }
                    }
                }

                if error.is_retryable() && retry_count < policy.max_retries {
                    let delay = policy.delay_for(retry_count);
                    debug!(
                        attempt = retry_count + 1,
                        max_retries = policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        code = %error.code,
                        "Retrying after transient error"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                    continue;
                }

                if error.is_retryable() {
                    warn!(
                        attempts = retry_count + 1,
                        code = %error.code,
                        "Max retries exceeded"
                    );
                }
                return RetryOutcome {
                    result: Err(error),
                    retry_count,
                    token_refreshed,
                };
            }
        }
    }
}
