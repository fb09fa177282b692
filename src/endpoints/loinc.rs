use super::{code_path, lookup_batch};
use crate::error::Result;
use crate::http::{ApiPath, HttpClient};
use crate::types::{ApiResponse, BatchLookupOptions, BatchResponse, Loinc, LookupOptions};

/// LOINC laboratory and clinical observation codes.
#[derive(Clone)]
pub struct LoincEndpoint {
    http: HttpClient,
}

impl LoincEndpoint {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Looks up a LOINC number, e.g. `2345-7`.
    #[tracing::instrument(skip(self, options))]
    pub async fn lookup(
        &self,
        loinc_num: &str,
        options: Option<&LookupOptions>,
    ) -> Result<ApiResponse<Loinc>> {
        let path = code_path(ApiPath::v1(["loinc"]), loinc_num)?;
        self.http.get(&path, options).await
    }

    #[tracing::instrument(skip(self, loinc_nums, options), fields(count = loinc_nums.len()))]
    pub async fn lookup_many<S: AsRef<str>>(
        &self,
        loinc_nums: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<Loinc>> {
        lookup_batch(&self.http, &ApiPath::v1(["loinc", "_batch"]), loinc_nums, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::{META, http_for};
    use crate::types::{IncludeOption, ResponseShape};
    use mockito::Matcher;

    #[tokio::test]
    async fn test_lookup_with_display() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/v1/loinc/2345-7")
            .match_query(Matcher::UrlEncoded("include".into(), "display".into()))
            .with_status(200)
            .with_body(format!(
                r#"{{"data": {{
                    "loinc_num": "2345-7",
                    "long_common_name": "Glucose [Mass/volume] in Serum or Plasma",
                    "component": "Glucose",
                    "display": "Glucose SerPl-mCnc"
                }}, "meta": {}}}"#,
                META
            ))
            .create_async()
            .await;

        let endpoint = LoincEndpoint::new(http_for(&url));
        let options = LookupOptions::default().with_include(IncludeOption::Display);
        let response = endpoint.lookup("2345-7", Some(&options)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.data.component, "Glucose");
        assert_eq!(response.data.display.as_deref(), Some("Glucose SerPl-mCnc"));
    }

    #[tokio::test]
    async fn test_lookup_many_forwards_shape() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/v1/loinc/_batch")
            .match_query(Matcher::UrlEncoded("shape".into(), "compact".into()))
            .with_status(200)
            .with_body(
                r#"{"results": [{"code": "2345-7", "found": true, "data": {
                        "loinc_num": "2345-7", "long_common_name": "Glucose", "component": "Glucose"}}],
                    "meta": {"legal": {"license": "LOINC"}, "shape": "compact",
                             "api_version": "v1", "total": 1, "found": 1, "not_found": 0}}"#,
            )
            .create_async()
            .await;

        let endpoint = LoincEndpoint::new(http_for(&url));
        let options = BatchLookupOptions::default().with_shape(ResponseShape::Compact);
        let response = endpoint.lookup_many(&["2345-7"], Some(&options)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.meta.response.legal.license, "LOINC");
    }
}
