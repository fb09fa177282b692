//! Retry decisions and error-response mapping.

use std::time::{Duration, UNIX_EPOCH};

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;

use super::path::ApiPath;
use crate::error::Error;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay of the exponential backoff, in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Body `code` that marks a 429 as a spent quota rather than a burst limit.
const QUOTA_EXCEEDED: &str = "QUOTA_EXCEEDED";

const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// What went wrong with one attempt.
#[derive(Debug)]
pub enum Failure<'a> {
    /// The server answered with a non-2xx status.
    Status {
        status: StatusCode,
        headers: &'a HeaderMap,
        body: &'a ErrorBody,
    },
    /// No response was received.
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(Duration),
    GiveUp,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before the retry that follows `attempt` (zero-based):
    /// `base_delay * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Decides whether the failed zero-based `attempt` is retried.
    ///
    /// Transport failures and 5xx use the backoff. 429 honours `Retry-After`
    /// when the server sends it and falls back to the backoff otherwise;
    /// a spent quota is final. Every other status is final.
    pub fn decide(&self, attempt: u32, failure: &Failure<'_>) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::GiveUp;
        }

        match failure {
            Failure::Transport => RetryDecision::Retry(self.backoff(attempt)),
            Failure::Status { status, .. } if status.is_server_error() => {
                RetryDecision::Retry(self.backoff(attempt))
            }
            Failure::Status {
                status,
                headers,
                body,
            } if *status == StatusCode::TOO_MANY_REQUESTS => {
                if body.is_quota_exceeded() {
                    return RetryDecision::GiveUp;
                }
                let delay = parse_retry_after(headers).unwrap_or_else(|| self.backoff(attempt));
                RetryDecision::Retry(delay)
            }
            Failure::Status { .. } => RetryDecision::GiveUp,
        }
    }
}

/// JSON error body as sent by the service. Every field is optional and a
/// body that is not JSON parses to the default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub code: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// `message`, then `error_description`, then `error`, then the status reason.
    pub fn message(&self, status: StatusCode) -> String {
        [&self.message, &self.error_description, &self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
            })
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.code.as_deref() == Some(QUOTA_EXCEEDED)
    }
}

/// Parses a `Retry-After` header given in whole seconds.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    header_u64(headers, RETRY_AFTER.as_str()).map(Duration::from_secs)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Maps a final non-2xx response onto the error taxonomy.
pub fn map_error_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: ErrorBody,
    path: &ApiPath,
) -> Error {
    let message = body.message(status);

    match status {
        StatusCode::UNAUTHORIZED => Error::Authentication { message },
        StatusCode::NOT_FOUND => path.not_found(),
        StatusCode::BAD_REQUEST => Error::Validation { message },
        StatusCode::TOO_MANY_REQUESTS => {
            if body.is_quota_exceeded() {
                return Error::QuotaExceeded { message };
            }
            Error::RateLimit {
                message,
                retry_after: parse_retry_after(headers),
                limit: header_u64(headers, RATE_LIMIT_LIMIT),
                remaining: header_u64(headers, RATE_LIMIT_REMAINING),
                reset: header_u64(headers, RATE_LIMIT_RESET)
                    .map(|secs| UNIX_EPOCH + Duration::from_secs(secs)),
            }
        }
        s if s.is_server_error() => Error::Server {
            message,
            status: s.as_u16(),
        },
        s => Error::Api {
            message,
            status: s.as_u16(),
            code: body.code,
            details: body.details,
        },
    }
}
