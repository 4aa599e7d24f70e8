//! Error taxonomy for talking to the assessment backend.

use std::time::Duration;

/// Code attached to transport failures (no response received).
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Code attached to 429 responses from the assessment endpoint.
pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";

/// Code attached to client-side validation failures.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Code attached to successful responses whose body could not be decoded.
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";

/// Quota window enforced by the backend on the assessment endpoint.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Errors produced while preparing, sending or decoding a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// A request field is missing or out of domain. Raised before any
    /// network call is made.
    Validation { field: &'static str, message: String },
    /// No response was received at all (connection refused, DNS, timeout).
    Network { message: String },
    /// The server answered with a non-2xx status.
    Http {
        status: u16,
        message: String,
        code: Option<String>,
    },
    /// HTTP 429 from the assessment endpoint.
    RateLimited {
        message: String,
        retry_after: Duration,
    },
    /// The server answered 2xx but the body was not JSON.
    InvalidResponse { status: u16, message: String },
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    /// The rate-limit error raised for the assessment endpoint.
    pub fn rate_limited() -> Self {
        ApiError::RateLimited {
            message: format!(
                "Rate limit exceeded. Please wait {} minutes before submitting another assessment.",
                RATE_LIMIT_WINDOW.as_secs() / 60
            ),
            retry_after: RATE_LIMIT_WINDOW,
        }
    }

    /// HTTP status carried by the error. Transport failures report 0.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { .. } => None,
            ApiError::Network { .. } => Some(0),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::InvalidResponse { status, .. } => Some(*status),
        }
    }

    /// Machine-readable error code, when one is known.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Validation { .. } => Some(VALIDATION_ERROR),
            ApiError::Network { .. } => Some(NETWORK_ERROR),
            ApiError::Http { code, .. } => code.as_deref(),
            ApiError::RateLimited { .. } => Some(RATE_LIMIT_EXCEEDED),
            ApiError::InvalidResponse { .. } => Some(INVALID_RESPONSE),
        }
    }

    /// Human-readable message without the status/code decoration.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. }
            | ApiError::Network { message }
            | ApiError::Http { message, .. }
            | ApiError::RateLimited { message, .. }
            | ApiError::InvalidResponse { message, .. } => message,
        }
    }

    /// Whether repeating the same request could succeed.
    /// Rate limiting and client validation failures never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Validation { .. } => false,
            other => !matches!(other.status(), Some(400) | Some(429)),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation { field, message } => {
                write!(f, "Invalid {}: {}", field, message)
            }
            ApiError::Network { message } => {
                write!(
                    f,
                    "Network error: {}. Check your connection and the API URL.",
                    message
                )
            }
            ApiError::Http {
                status,
                message,
                code: Some(code),
            } => write!(f, "{} (HTTP {}, {})", message, status, code),
            ApiError::Http { status, message, .. } => write!(f, "{} (HTTP {})", message, status),
            ApiError::RateLimited { message, .. } => write!(f, "{}", message),
            ApiError::InvalidResponse { status, message } => {
                write!(f, "Invalid response (HTTP {}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for ApiError {}
