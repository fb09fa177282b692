//! HTTP transport with authentication, timeouts, retries and error mapping.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::auth::TokenSource;
use super::path::ApiPath;
use super::retry::{ErrorBody, Failure, RetryDecision, RetryPolicy, map_error_response};
use crate::error::{Error, Result};
use crate::types::{LookupOptions, SearchOptions};

/// Shared transport used by every endpoint. Cloning is cheap.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
    policy: RetryPolicy,
    timeout: Duration,
}

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpClient {
    pub fn new(
        client: Client,
        base_url: Url,
        tokens: Arc<dyn TokenSource>,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url,
            tokens,
            policy,
            timeout,
        }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self, path, options), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &ApiPath,
        options: Option<&LookupOptions>,
    ) -> Result<T> {
        let query = options.map(LookupOptions::query_pairs).unwrap_or_default();
        self.execute(Method::GET, path, |request| request.query(&query))
            .await
    }

    /// Performs a POST request with a JSON body.
    #[tracing::instrument(skip(self, path, body, options), fields(path = %path))]
    pub async fn post<T, B>(
        &self,
        path: &ApiPath,
        body: &B,
        options: Option<&LookupOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|e| Error::validation(format!("Failed to encode request body: {}", e)))?;
        let query = options.map(LookupOptions::query_pairs).unwrap_or_default();

        self.execute(Method::POST, path, |request| {
            request
                .query(&query)
                .header(CONTENT_TYPE, "application/json")
                .body(payload.clone())
        })
        .await
    }

    /// Performs a GET request whose filters are sent as query parameters.
    #[tracing::instrument(skip(self, path, params, options), fields(path = %path))]
    pub async fn search<T, P>(
        &self,
        path: &ApiPath,
        params: &P,
        options: Option<&SearchOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let paging = options.map(SearchOptions::query_pairs).unwrap_or_default();
        self.execute(Method::GET, path, |request| {
            request.query(params).query(&paging)
        })
        .await
    }

    /// Runs one logical request through the retry loop.
    ///
    /// `build` decorates a fresh request for every attempt, so bodies and
    /// query strings are re-sent unchanged.
    async fn execute<T, F>(&self, method: Method, path: &ApiPath, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = path.url(&self.base_url)?;
        let max_attempts = self.policy.max_attempts();
        let mut last_error = None;

        for attempt in 0..max_attempts {
            let token = self.tokens.bearer_token().await?;
            let request = build(
                self.client
                    .request(method.clone(), url.clone())
                    .bearer_auth(&token)
                    .header(ACCEPT, "application/json"),
            );

            debug!(
                "{} {} (attempt {}/{})...",
                method,
                path,
                attempt + 1,
                max_attempts
            );

            let response = match tokio::time::timeout(self.timeout, send_once(request)).await {
                Err(_) => {
                    debug!("{} {}: no response within {:?}", method, path, self.timeout);
                    return Err(Error::Timeout {
                        timeout: self.timeout,
                    });
                }
                Ok(Err(e)) if e.is_timeout() => {
                    return Err(Error::Timeout {
                        timeout: self.timeout,
                    });
                }
                Ok(Err(e)) => match self.policy.decide(attempt, &Failure::Transport) {
                    RetryDecision::Retry(delay) => {
                        warn!(
                            "{} {}: attempt {}/{} failed ({}), retrying in {}ms...",
                            method,
                            path,
                            attempt + 1,
                            max_attempts,
                            e,
                            delay.as_millis()
                        );
                        last_error = Some(e);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    RetryDecision::GiveUp => {
                        return Err(Error::Network {
                            message: e.to_string(),
                            source: Some(e),
                        });
                    }
                },
                Ok(Ok(response)) => response,
            };

            if response.status.is_success() {
                return serde_json::from_slice(&response.body).map_err(|source| Error::Decode {
                    path: path.to_string(),
                    source,
                });
            }

            let body = ErrorBody::parse(&response.body);
            if response.status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate().await;
            }

            let failure = Failure::Status {
                status: response.status,
                headers: &response.headers,
                body: &body,
            };
            match self.policy.decide(attempt, &failure) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        "{} {}: HTTP {} on attempt {}/{}, retrying in {}ms...",
                        method,
                        path,
                        response.status.as_u16(),
                        attempt + 1,
                        max_attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    debug!(
                        "{} {}: giving up with HTTP {}",
                        method,
                        path,
                        response.status.as_u16()
                    );
                    return Err(map_error_response(
                        response.status,
                        &response.headers,
                        body,
                        path,
                    ));
                }
            }
        }

        Err(Error::Network {
            message: format!("{} {}: failed after {} attempts", method, path, max_attempts),
            source: last_error,
        })
    }
}

/// Single attempt without retry: sends the request and reads the whole body.
async fn send_once(request: RequestBuilder) -> reqwest::Result<RawResponse> {
    let response = request.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();
    Ok(RawResponse {
        status,
        headers,
        body,
    })
}
