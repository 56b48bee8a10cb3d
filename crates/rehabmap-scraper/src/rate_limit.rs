//! Retry utilities for the directory and geocoder clients.
//!
//! Transient HTTP failures (429, 5xx, network errors) are retried with
//! exponential backoff. Everything else propagates immediately.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ScraperError;

/// Upper bound on random jitter added to each non-zero backoff delay.
const MAX_JITTER_MS: u64 = 250;

/// How many times, and how patiently, to retry a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retry attempts after the first failure.
    pub max_retries: u32,
    /// Base delay for backoff: `backoff_base_secs * 2^attempt`.
    pub backoff_base_secs: u64,
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base_secs: 0,
        }
    }
}

/// Returns `true` if `err` represents a transient condition.
///
/// Retriable:
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::Http`]: network-level failure.
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
///
/// Not-found, 4xx, bot challenges and parse failures will not change on retry.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// With `max_retries = 3` the operation is attempted at most 4 times total.
/// The wait before retry `n` is `backoff_base_secs * 2^(n-1)` seconds plus up
/// to 250 ms of jitter; a zero base disables both.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= policy.max_retries {
            return Err(err);
        }

        let delay_secs = policy
            .backoff_base_secs
            .saturating_mul(1u64 << attempt.min(62));
        let jitter_ms = if delay_secs > 0 {
            rand::rng().random_range(0..=MAX_JITTER_MS)
        } else {
            0
        };
        tracing::warn!(
            attempt,
            max_retries = policy.max_retries,
            delay_secs,
            jitter_ms,
            error = %err,
            "transient scraper error; retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs) + Duration::from_millis(jitter_ms))
            .await;
        attempt += 1;
    }
}
