//! Retry logic for backend requests with error classification.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use serde_json::Value;

use super::error::ApiError;

/// Default number of attempts for a submission.
pub const MAX_RETRIES: usize = 3;

/// Default base delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay after the given failed attempt (numbered from 1).
    /// Linear in the attempt number.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        self.base_delay
            .saturating_mul(u32::try_from(attempt).unwrap_or(u32::MAX))
    }
}

/// Progress of a single submission through the retry loop.
///
/// `Idle -> Sending -> {Success, Retrying -> Sending, Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Sending { attempt: usize },
    Retrying { attempt: usize, delay: Duration },
    Success,
    Failed,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Success | SubmissionState::Failed)
    }
}

/// Builds the error for a non-2xx response.
///
/// The body is searched for a JSON `message` (or `error`) and `code`.
/// `rate_limited_endpoint` marks endpoints whose 429 responses carry the
/// fixed quota window.
pub fn classify_response(status: StatusCode, body: &str, rate_limited_endpoint: bool) -> ApiError {
    if status == StatusCode::TOO_MANY_REQUESTS && rate_limited_endpoint {
        return ApiError::rate_limited();
    }

    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    let message = field("message")
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

    ApiError::Http {
        status: status.as_u16(),
        message,
        code: field("code"),
    }
}

/// Maps a reqwest failure to the error taxonomy.
/// Anything that produced no response counts as a network failure.
pub fn classify_transport(error: &reqwest::Error) -> ApiError {
    match error.status() {
        Some(status) => ApiError::Http {
            status: status.as_u16(),
            message: error.to_string(),
            code: None,
        },
        None => ApiError::network(error.to_string()),
    }
}

/// Executes an async operation with retry logic.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    policy: &RetryPolicy,
    operation: F,
) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    with_retry_observed(operation_name, policy, operation, |_| {}).await
}

/// Executes an async operation with retry logic, reporting every state
/// transition to `observer`.
///
/// Stops immediately on non-retryable errors (400, 429, validation).
/// After the last attempt the final error is returned unchanged.
pub async fn with_retry_observed<F, Fut, T, O>(
    operation_name: &str,
    policy: &RetryPolicy,
    operation: F,
    mut observer: O,
) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    O: FnMut(SubmissionState),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        observer(SubmissionState::Sending { attempt });

        match operation().await {
            Ok(result) => {
                observer(SubmissionState::Success);
                return Ok(result);
            }
            Err(e) => {
                if !e.is_retryable() {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    observer(SubmissionState::Failed);
                    return Err(e);
                }

                if attempt >= max_attempts {
                    warn!(
                        "{}: failed after {} attempts ({})",
                        operation_name, attempt, e
                    );
                    observer(SubmissionState::Failed);
                    return Err(e);
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                    operation_name,
                    attempt,
                    max_attempts,
                    e,
                    delay.as_millis()
                );
                observer(SubmissionState::Retrying { attempt, delay });
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
