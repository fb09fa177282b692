use super::{code_path, lookup_batch};
use crate::error::Result;
use crate::http::{ApiPath, HttpClient};
use crate::types::{ApiResponse, BatchLookupOptions, BatchResponse, LookupOptions, Mvx};

/// CDC vaccine manufacturer codes.
#[derive(Clone)]
pub struct MvxEndpoint {
    http: HttpClient,
}

impl MvxEndpoint {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn lookup(&self, code: &str, options: Option<&LookupOptions>) -> Result<ApiResponse<Mvx>> {
        let path = code_path(ApiPath::v1(["mvx"]), code)?;
        self.http.get(&path, options).await
    }

    #[tracing::instrument(skip(self, codes, options), fields(count = codes.len()))]
    pub async fn lookup_many<S: AsRef<str>>(
        &self,
        codes: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<Mvx>> {
        lookup_batch(&self.http, &ApiPath::v1(["mvx", "_batch"]), codes, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::{META, http_for};
    use crate::error::Error;

    #[tokio::test]
    async fn test_lookup_full() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/v1/mvx/PFR")
            .with_status(200)
            .with_body(format!(
                r#"{{"data": {{
                    "mvx_code": "PFR",
                    "manufacturer_name": "Pfizer, Inc",
                    "vaccines": [{{"cvx_code": "208", "vaccine_name": "COVID-19 mRNA"}}]
                }}, "meta": {}}}"#,
                META
            ))
            .create_async()
            .await;

        let endpoint = MvxEndpoint::new(http_for(&url));
        let response = endpoint.lookup("PFR", None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.data.vaccines.len(), 1);
        assert_eq!(response.data.vaccines[0].cvx_code, "208");
    }

    #[tokio::test]
    async fn test_lookup_many_empty_input() {
        let endpoint = MvxEndpoint::new(http_for("http://127.0.0.1:1"));
        let codes: Vec<String> = Vec::new();
        let err = endpoint.lookup_many(&codes, None).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
