//! Bearer tokens: static API keys and OAuth client-credentials tokens.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use super::retry::ErrorBody;
use crate::error::{Error, Result};

/// Tokens are refreshed this long before the server says they expire.
pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// How the client authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A long-lived API key, sent as the bearer token.
    ApiKey(String),
    /// OAuth 2.0 client-credentials grant.
    OAuth {
        client_id: String,
        client_secret: String,
        /// Token endpoint; `<base_url>/oauth2/token` when unset.
        token_url: Option<String>,
        scopes: Vec<String>,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(key) => f.debug_tuple("ApiKey").field(&mask_secret(key)).finish(),
            Credentials::OAuth {
                client_id,
                token_url,
                scopes,
                ..
            } => f
                .debug_struct("OAuth")
                .field("client_id", client_id)
                .field("client_secret", &"****")
                .field("token_url", token_url)
                .field("scopes", scopes)
                .finish(),
        }
    }
}

/// Masks all but the first and last four characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Supplies the bearer token for each request attempt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;

    /// Drops any cached token after the server rejected it.
    async fn invalidate(&self) {}
}

/// A fixed API key.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.refresh_at
    }
}

/// Fetches OAuth access tokens and reuses them until shortly before expiry.
///
/// The cache lock is held across a refresh, so concurrent callers wait for
/// one token request instead of each sending their own.
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
    timeout: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(
        client: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scopes: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes,
            timeout,
            cached: Mutex::new(None),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    #[tracing::instrument(skip(self), fields(token_url = %self.token_url))]
    async fn fetch(&self) -> Result<CachedToken> {
        debug!("Requesting OAuth token from {}...", self.token_url);

        let mut form = vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
        ];
        if !self.scopes.is_empty() {
            form.push(("scope", self.scopes.join(" ")));
        }

        let request = self
            .client
            .post(&self.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form);

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.timeout, exchange).await {
            Err(_) => {
                return Err(Error::Timeout {
                    timeout: self.timeout,
                });
            }
            Ok(Err(e)) => {
                return Err(Error::Network {
                    message: format!("Token request failed: {}", e),
                    source: Some(e),
                });
            }
            Ok(Ok(parts)) => parts,
        };

        if !status.is_success() {
            return Err(token_error(status, ErrorBody::parse(&body)));
        }

        let token: TokenResponse =
            serde_json::from_slice(&body).map_err(|source| Error::Decode {
                path: self.token_url.clone(),
                source,
            })?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS));
        debug!(
            "Received {} token {} valid for {}s",
            token.token_type.as_deref().unwrap_or("bearer"),
            mask_secret(&token.access_token),
            lifetime.as_secs()
        );

        let now = Instant::now();
        let refresh_at = now
            .checked_add(lifetime.saturating_sub(TOKEN_REFRESH_MARGIN))
            .unwrap_or_else(|| {
                let fallback = Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS);
                now + fallback.saturating_sub(TOKEN_REFRESH_MARGIN)
            });

        Ok(CachedToken {
            access_token: token.access_token,
            refresh_at,
        })
    }
}

fn token_error(status: StatusCode, body: ErrorBody) -> Error {
    let message = body.message(status);
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Error::Authentication { message },
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

#[async_trait]
impl TokenSource for TokenManager {
    async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let token = self.fetch().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn invalidate(&self) {
        debug!("Discarding cached OAuth token");
        *self.cached.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn manager(url: &str) -> TokenManager {
        TokenManager::new(
            Client::new(),
            format!("{}/oauth2/token", url),
            "client-1",
            "s3cret",
            vec!["read:ndc".to_string(), "read:npi".to_string()],
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret("ffly_live_1234567890abcd"), "ffly****abcd");
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let creds = Credentials::OAuth {
            client_id: "client-1".to_string(),
            client_secret: "super-secret-value".to_string(),
            token_url: None,
            scopes: vec![],
        };
        let printed = format!("{:?}", creds);
        assert!(printed.contains("client-1"));
        assert!(!printed.contains("super-secret-value"));

        let printed = format!("{:?}", Credentials::ApiKey("ffly_live_1234567890abcd".into()));
        assert!(!printed.contains("1234567890"));
    }

    #[tokio::test]
    async fn test_static_token() {
        let source = StaticToken::new("key-123");
        assert_eq!(source.bearer_token().await.unwrap(), "key-123");
        source.invalidate().await;
        assert_eq!(source.bearer_token().await.unwrap(), "key-123");
    }

    #[tokio::test]
    async fn test_token_manager_fetches_and_caches() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "client-1".into()),
                Matcher::UrlEncoded("client_secret".into(), "s3cret".into()),
                Matcher::UrlEncoded("scope".into(), "read:ndc read:npi".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "tok-1", "token_type": "Bearer", "expires_in": 3600}"#)
            .expect(1)
            .create_async()
            .await;

        let tokens = manager(&url);
        assert_eq!(tokens.bearer_token().await.unwrap(), "tok-1");
        assert_eq!(tokens.bearer_token().await.unwrap(), "tok-1");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(r#"{"access_token": "tok-shared", "expires_in": 3600}"#)
            .expect(1)
            .create_async()
            .await;

        let tokens = manager(&url);
        let (a, b, c) = tokio::join!(
            tokens.bearer_token(),
            tokens.bearer_token(),
            tokens.bearer_token()
        );

        assert_eq!(a.unwrap(), "tok-shared");
        assert_eq!(b.unwrap(), "tok-shared");
        assert_eq!(c.unwrap(), "tok-shared");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_huge_expiry_does_not_overflow() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(format!(
                r#"{{"access_token": "tok-forever", "expires_in": {}}}"#,
                u64::MAX
            ))
            .expect(1)
            .create_async()
            .await;

        let tokens = manager(&url);
        assert_eq!(tokens.bearer_token().await.unwrap(), "tok-forever");
        assert_eq!(tokens.bearer_token().await.unwrap(), "tok-forever");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_manager_refreshes_short_lived_tokens() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        // Shorter than the refresh margin, so never considered fresh.
        let mock = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(r#"{"access_token": "tok-short", "expires_in": 30}"#)
            .expect(2)
            .create_async()
            .await;

        let tokens = manager(&url);
        tokens.bearer_token().await.unwrap();
        tokens.bearer_token().await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_manager_invalidate_forces_refetch() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(r#"{"access_token": "tok-1", "expires_in": 3600}"#)
            .expect(2)
            .create_async()
            .await;

        let tokens = manager(&url);
        tokens.bearer_token().await.unwrap();
        tokens.invalidate().await;
        tokens.bearer_token().await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_manager_rejected_credentials() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(401)
            .with_body(r#"{"error": "invalid_client", "error_description": "Unknown client"}"#)
            .create_async()
            .await;

        let result = manager(&url).bearer_token().await;
        match result {
            Err(Error::Authentication { message }) => assert_eq!(message, "Unknown client"),
            other => panic!("Expected Authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_token_manager_server_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(502)
            .create_async()
            .await;

        let result = manager(&url).bearer_token().await;
        assert!(matches!(result, Err(Error::Server { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_token_manager_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(r#"{"token": "wrong-field"}"#)
            .create_async()
            .await;

        let result = manager(&url).bearer_token().await;
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[tokio::test]
    async fn test_token_manager_connection_refused() {
        let tokens = TokenManager::new(
            Client::new(),
            "http://127.0.0.1:1/oauth2/token",
            "id",
            "secret",
            vec![],
            Duration::from_secs(5),
        );
        let result = tokens.bearer_token().await;
        assert!(matches!(result, Err(Error::Network { .. })));
    }
}
