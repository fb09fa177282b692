//! Client configuration.

use std::time::Duration;

use log::debug;
use reqwest::Url;

use crate::error::{Error, Result};
use crate::http::{Credentials, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, RetryPolicy, mask_secret};

pub const DEFAULT_BASE_URL: &str = "https://api.fhirfly.io";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_API_KEY: &str = "FHIRFLY_API_KEY";
pub const ENV_CLIENT_ID: &str = "FHIRFLY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "FHIRFLY_CLIENT_SECRET";
pub const ENV_TOKEN_URL: &str = "FHIRFLY_TOKEN_URL";
pub const ENV_SCOPES: &str = "FHIRFLY_SCOPES";
pub const ENV_BASE_URL: &str = "FHIRFLY_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "FHIRFLY_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "FHIRFLY_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "FHIRFLY_RETRY_DELAY_MS";

fn default_user_agent() -> String {
    format!("fhirfly-rs/{}", env!("CARGO_PKG_VERSION"))
}

/// Settings for [`crate::Fhirfly`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
    /// Deadline of a single attempt.
    pub timeout: Duration,
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Base of the exponential backoff.
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration authenticating with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_credentials(Credentials::ApiKey(api_key.into()))
    }

    /// Configuration using the OAuth client-credentials grant.
    pub fn oauth(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::with_credentials(Credentials::OAuth {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: None,
            scopes: Vec::new(),
        })
    }

    fn with_credentials(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            user_agent: default_user_agent(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides the OAuth token endpoint. No effect for API-key credentials.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        if let Credentials::OAuth { token_url, .. } = &mut self.credentials {
            *token_url = Some(url.into());
        }
        self
    }

    /// Sets the OAuth scopes. No effect for API-key credentials.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Credentials::OAuth { scopes: current, .. } = &mut self.credentials {
            *current = scopes.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Reads the configuration from `FHIRFLY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    ///
    /// An API key wins over client credentials when both are set.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = if let Some(key) = get(ENV_API_KEY) {
            debug!("Using {} for authentication: {}", ENV_API_KEY, mask_secret(&key));
            Self::new(key)
        } else if let (Some(id), Some(secret)) = (get(ENV_CLIENT_ID), get(ENV_CLIENT_SECRET)) {
            debug!("Using OAuth client credentials for client {}", id);
            let mut config = Self::oauth(id, secret);
            if let Some(url) = get(ENV_TOKEN_URL) {
                config = config.with_token_url(url);
            }
            if let Some(scopes) = get(ENV_SCOPES) {
                config = config.with_scopes(scopes.split([' ', ',']).filter(|s| !s.is_empty()));
            }
            config
        } else {
            return Err(Error::Config(format!(
                "API key is required. Set {} or {} and {}.",
                ENV_API_KEY, ENV_CLIENT_ID, ENV_CLIENT_SECRET
            )));
        };

        if let Some(url) = get(ENV_BASE_URL) {
            config = config.with_base_url(url);
        }
        if let Some(ms) = get(ENV_TIMEOUT_MS) {
            config = config.with_timeout(Duration::from_millis(parse_number(ENV_TIMEOUT_MS, &ms)?));
        }
        if let Some(n) = get(ENV_MAX_RETRIES) {
            config = config.with_max_retries(parse_number(ENV_MAX_RETRIES, &n)?);
        }
        if let Some(ms) = get(ENV_RETRY_DELAY_MS) {
            config = config.with_retry_delay(Duration::from_millis(parse_number(ENV_RETRY_DELAY_MS, &ms)?));
        }

        Ok(config)
    }

    /// Checks the configuration and returns the parsed base URL.
    pub fn validate(&self) -> Result<Url> {
        match &self.credentials {
            Credentials::ApiKey(key) if key.trim().is_empty() => {
                return Err(Error::Config("API key is required".to_string()));
            }
            Credentials::OAuth {
                client_id,
                client_secret,
                ..
            } if client_id.trim().is_empty() || client_secret.trim().is_empty() => {
                return Err(Error::Config(
                    "OAuth client id and client secret are required".to_string(),
                ));
            }
            _ => {}
        }

        if self.timeout.is_zero() {
            return Err(Error::Config("Timeout must be greater than zero".to_string()));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", self.base_url, e)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Base URL must be an http(s) URL: {}",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Token endpoint for OAuth credentials, defaulting to `<base_url>/oauth2/token`.
    pub fn token_url(&self) -> Option<String> {
        match &self.credentials {
            Credentials::ApiKey(_) => None,
            Credentials::OAuth { token_url, .. } => Some(
                token_url
                    .clone()
                    .unwrap_or_else(|| format!("{}/oauth2/token", self.base_url)),
            ),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", name, value)))
}
