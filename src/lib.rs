//! Client for the FHIRfly healthcare reference-data API.
//!
//! ```no_run
//! # async fn run() -> fhirfly::Result<()> {
//! let client = fhirfly::Fhirfly::with_api_key("ffly_live_...")?;
//! let ndc = client.ndc().lookup("0069-0151-01", None).await?;
//! println!("{}", ndc.data.product_name);
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod types;

use std::sync::Arc;

use log::debug;
use reqwest::Client;

pub use config::ClientConfig;
pub use error::{Error, Result};

use endpoints::{
    CvxEndpoint, FdaLabelsEndpoint, Icd10Endpoint, LoincEndpoint, MvxEndpoint, NdcEndpoint,
    NpiEndpoint, RxNormEndpoint,
};
use http::{Credentials, HttpClient, StaticToken, TokenManager, TokenSource};

/// Entry point: one endpoint per code system over a shared transport.
#[derive(Clone)]
pub struct Fhirfly {
    http: HttpClient,
    ndc: NdcEndpoint,
    npi: NpiEndpoint,
    rxnorm: RxNormEndpoint,
    loinc: LoincEndpoint,
    icd10: Icd10Endpoint,
    cvx: CvxEndpoint,
    mvx: MvxEndpoint,
    fda_labels: FdaLabelsEndpoint,
}

impl Fhirfly {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.validate()?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let tokens: Arc<dyn TokenSource> = match &config.credentials {
            Credentials::ApiKey(key) => Arc::new(StaticToken::new(key.as_str())),
            Credentials::OAuth {
                client_id,
                client_secret,
                scopes,
                ..
            } => {
                let token_url = config
                    .token_url()
                    .ok_or_else(|| Error::Config("OAuth token URL is missing".to_string()))?;
                debug!("Using OAuth client credentials against {}", token_url);
                Arc::new(TokenManager::new(
                    client.clone(),
                    token_url,
                    client_id.as_str(),
                    client_secret.as_str(),
                    scopes.clone(),
                    config.timeout,
                ))
            }
        };

        debug!(
            "FHIRfly client for {} (timeout {:?}, {} retries)",
            base_url, config.timeout, config.max_retries
        );
        let http = HttpClient::new(
            client,
            base_url,
            tokens,
            config.retry_policy(),
            config.timeout,
        );

        Ok(Self {
            ndc: NdcEndpoint::new(http.clone()),
            npi: NpiEndpoint::new(http.clone()),
            rxnorm: RxNormEndpoint::new(http.clone()),
            loinc: LoincEndpoint::new(http.clone()),
            icd10: Icd10Endpoint::new(http.clone()),
            cvx: CvxEndpoint::new(http.clone()),
            mvx: MvxEndpoint::new(http.clone()),
            fda_labels: FdaLabelsEndpoint::new(http.clone()),
            http,
        })
    }

    /// Client with default settings and an API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(api_key))
    }

    /// Client configured from `FHIRFLY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn ndc(&self) -> &NdcEndpoint {
        &self.ndc
    }

    pub fn npi(&self) -> &NpiEndpoint {
        &self.npi
    }

    pub fn rxnorm(&self) -> &RxNormEndpoint {
        &self.rxnorm
    }

    pub fn loinc(&self) -> &LoincEndpoint {
        &self.loinc
    }

    pub fn icd10(&self) -> &Icd10Endpoint {
        &self.icd10
    }

    pub fn cvx(&self) -> &CvxEndpoint {
        &self.cvx
    }

    pub fn mvx(&self) -> &MvxEndpoint {
        &self.mvx
    }

    pub fn fda_labels(&self) -> &FdaLabelsEndpoint {
        &self.fda_labels
    }

    /// The shared transport, for routes without a typed endpoint.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_missing_api_key() {
        let err = Fhirfly::with_api_key("").err().unwrap();
        assert!(matches!(&err, Error::Config(msg) if msg.contains("API key is required")));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Fhirfly::new(ClientConfig::new("k").with_base_url("::nope::"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_transport_carries_config() {
        let client = Fhirfly::new(
            ClientConfig::new("k")
                .with_base_url("http://localhost:9000")
                .with_timeout(Duration::from_millis(1500))
                .with_max_retries(5),
        )
        .unwrap();
        assert_eq!(client.http().base_url().as_str(), "http://localhost:9000/");
        assert_eq!(client.http().timeout(), Duration::from_millis(1500));
        assert_eq!(client.http().retry_policy().max_retries, 5);
    }

    #[tokio::test]
    async fn test_api_key_and_user_agent_sent() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/v1/cvx/208")
            .match_header("authorization", "Bearer ffly_test_key")
            .match_header("user-agent", "fhirfly-test/1.0")
            .with_status(200)
            .with_body(
                r#"{"data": {"cvx_code": "208", "short_description": "COVID-19 mRNA"},
                    "meta": {"legal": {"license": "public-domain"}, "shape": "standard", "api_version": "v1"}}"#,
            )
            .create_async()
            .await;

        let client = Fhirfly::new(
            ClientConfig::new("ffly_test_key")
                .with_base_url(url)
                .with_user_agent("fhirfly-test/1.0"),
        )
        .unwrap();
        let response = client.cvx().lookup("208", None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.data.short_description, "COVID-19 mRNA");
    }

    #[tokio::test]
    async fn test_oauth_flow_end_to_end() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let token = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(r#"{"access_token": "oauth-token", "token_type": "Bearer", "expires_in": 3600}"#)
            .expect(1)
            .create_async()
            .await;
        let lookup = server
            .mock("GET", "/v1/mvx/PFR")
            .match_header("authorization", "Bearer oauth-token")
            .with_status(200)
            .with_body(
                r#"{"data": {"mvx_code": "PFR", "manufacturer_name": "Pfizer, Inc"},
                    "meta": {"legal": {"license": "public-domain"}, "shape": "standard", "api_version": "v1"}}"#,
            )
            .expect(2)
            .create_async()
            .await;

        let client = Fhirfly::new(ClientConfig::oauth("client-1", "s3cret").with_base_url(url)).unwrap();
        client.mvx().lookup("PFR", None).await.unwrap();
        client.mvx().lookup("PFR", None).await.unwrap();

        token.assert_async().await;
        lookup.assert_async().await;
    }
}
