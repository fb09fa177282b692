use super::{code_path, lookup_batch};
use crate::error::Result;
use crate::http::{ApiPath, HttpClient};
use crate::types::{ApiResponse, BatchLookupOptions, BatchResponse, Cvx, LookupOptions};

/// CDC vaccine codes.
#[derive(Clone)]
pub struct CvxEndpoint {
    http: HttpClient,
}

impl CvxEndpoint {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn lookup(&self, code: &str, options: Option<&LookupOptions>) -> Result<ApiResponse<Cvx>> {
        let path = code_path(ApiPath::v1(["cvx"]), code)?;
        self.http.get(&path, options).await
    }

    #[tracing::instrument(skip(self, codes, options), fields(count = codes.len()))]
    pub async fn lookup_many<S: AsRef<str>>(
        &self,
        codes: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<Cvx>> {
        lookup_batch(&self.http, &ApiPath::v1(["cvx", "_batch"]), codes, options).await
    }
}
