//! Error taxonomy for API calls.
//!
//! Every non-2xx response is mapped onto one of these variants by the
//! transport layer. Client-side argument checks reuse [`Error::Validation`].

use std::time::{Duration, SystemTime};

use reqwest::StatusCode;

/// Result alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the FHIRfly client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP 401, or the token endpoint rejected the client credentials.
    #[error("Authentication failed: {message}. Check your API key or client credentials.")]
    Authentication { message: String },

    /// HTTP 404 for a single-code lookup.
    #[error("{code_type} not found: {code}")]
    NotFound { code_type: String, code: String },

    /// HTTP 400, or a request rejected before it was sent.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// HTTP 429 after the retry budget was spent.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<Duration>,
        limit: Option<u64>,
        remaining: Option<u64>,
        reset: Option<SystemTime>,
    },

    /// HTTP 429 with a `QUOTA_EXCEEDED` body. Never retried.
    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// HTTP 5xx after the retry budget was spent.
    #[error("Server error (HTTP {status}): {message}")]
    Server { message: String, status: u16 },

    /// Any other non-2xx response.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        status: u16,
        code: Option<String>,
        details: Option<serde_json::Value>,
    },

    /// The request never produced a response.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A single attempt took longer than the configured timeout.
    #[error("Request timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    /// A 2xx response whose body did not match the expected type.
    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The client configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        let code = match self {
            Error::Authentication { .. } => 401,
            Error::NotFound { .. } => 404,
            Error::RateLimit { .. } | Error::QuotaExceeded { .. } => 429,
            Error::Server { status, .. } | Error::Api { status, .. } => *status,
            _ => return None,
        };
        StatusCode::from_u16(code).ok()
    }

    /// Whether the same request could succeed if sent again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::RateLimit { .. }
                | Error::Server { .. }
                | Error::Network { .. }
                | Error::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            code_type: "NDC".to_string(),
            code: "0069-0151-01".to_string(),
        };
        assert_eq!(err.to_string(), "NDC not found: 0069-0151-01");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_authentication_display_mentions_credentials() {
        let err = Error::Authentication {
            message: "Invalid API key".to_string(),
        };
        assert!(err.to_string().contains("Invalid API key"));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout {
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "Request timed out after 1500ms");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_status_for_server_and_api_errors() {
        let err = Error::Server {
            message: "boom".to_string(),
            status: 503,
        };
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));

        let err = Error::Api {
            message: "conflict".to_string(),
            status: 409,
            code: Some("CONFLICT".to_string()),
            details: None,
        };
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn test_is_retryable() {
        assert!(
            Error::Server {
                message: String::new(),
                status: 500
            }
            .is_retryable()
        );
        assert!(
            Error::Timeout {
                timeout: Duration::from_secs(1)
            }
            .is_retryable()
        );
        assert!(!Error::validation("bad").is_retryable());
        assert!(
            !Error::QuotaExceeded {
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!Error::Config("missing key".to_string()).is_retryable());
    }
}
