//! Bounded exponential-backoff retry wrapper
//!
//! Wraps any single API request. Two conditions trigger a backoff without
//! counting as an application error: a successful response whose measured
//! utilization is at or past 100%, and the platform's transient rate-limit
//! error codes. Any other error propagates immediately. The calling task
//! sleeps in place; there is no cancellation path once a sleep has started.

use crate::api::ApiResponse;
use crate::throttle::UsageSample;
use crate::{ApiError, ApiResult};
use std::future::Future;
use std::time::Duration;

/// Total attempts before giving up
pub const MAX_ATTEMPTS: u32 = 5;

/// First backoff duration in seconds; doubles per attempt
pub const BASE_BACKOFF_SECS: u64 = 60;

/// Backoff for the given zero-indexed attempt: 60s, 120s, 240s, 480s, 960s.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(BASE_BACKOFF_SECS << attempt)
}

/// Invokes `op` until it yields a usable response or retries are exhausted.
///
/// # Arguments
///
/// * `op` - Closure producing the request future; called once per attempt
///   with identical arguments (the closure re-captures them)
///
/// # Returns
///
/// * `Ok(ApiResponse<T>)` - A response with utilization below 100%
/// * `Err(ApiError::MaxRetriesExceeded)` - All attempts were throttled
/// * `Err(_)` - The first non-transient error, unretried
pub async fn call_with_backoff<T, F, Fut>(mut op: F) -> ApiResult<ApiResponse<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<ApiResponse<T>>>,
{
    for attempt in 0..MAX_ATTEMPTS {
        match op().await {
            Ok(response) => {
                let usage = UsageSample::measure(&response.meta);
                if usage.overall() < 100.0 {
                    return Ok(response);
                }
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    "API utilization at {:.0}%, backing off {}s (attempt {}/{})",
                    usage.overall(),
                    delay.as_secs(),
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) if err.is_transient_rate_limit() => {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    "Transient rate limit ({}), backing off {}s (attempt {}/{})",
                    err,
                    delay.as_secs(),
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }

    Err(ApiError::MaxRetriesExceeded {
        attempts: MAX_ATTEMPTS,
    })
}
