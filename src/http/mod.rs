//! Error taxonomy, response classification and retry logic for backend calls.

mod error;
mod retry;

pub use error::{
    ApiError, INVALID_RESPONSE, NETWORK_ERROR, RATE_LIMIT_EXCEEDED, RATE_LIMIT_WINDOW,
    VALIDATION_ERROR,
};
pub use retry::{
    MAX_RETRIES, RETRY_DELAY_MS, RetryPolicy, SubmissionState, classify_response,
    classify_transport, with_retry, with_retry_observed,
};
