//! HTTP transport: authentication, retries and error mapping.

mod auth;
mod client;
mod path;
mod retry;

pub use auth::{Credentials, StaticToken, TOKEN_REFRESH_MARGIN, TokenManager, TokenSource, mask_secret};
pub use client::HttpClient;
pub use path::ApiPath;
pub use retry::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, RetryPolicy};
