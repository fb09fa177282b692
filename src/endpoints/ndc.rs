use log::debug;

use super::{code_path, lookup_batch};
use crate::error::Result;
use crate::http::{ApiPath, HttpClient};
use crate::types::{ApiResponse, BatchLookupOptions, BatchResponse, LookupOptions, Ndc};

/// National Drug Codes.
#[derive(Clone)]
pub struct NdcEndpoint {
    http: HttpClient,
}

impl NdcEndpoint {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Looks up a product or package NDC, e.g. `0069-0151-01`.
    #[tracing::instrument(skip(self, options))]
    pub async fn lookup(&self, ndc: &str, options: Option<&LookupOptions>) -> Result<ApiResponse<Ndc>> {
        debug!("Looking up NDC {}", ndc);
        let path = code_path(ApiPath::v1(["ndc"]), ndc)?;
        self.http.get(&path, options).await
    }

    /// Looks up many NDCs, batching requests when needed.
    #[tracing::instrument(skip(self, ndcs, options), fields(count = ndcs.len()))]
    pub async fn lookup_many<S: AsRef<str>>(
        &self,
        ndcs: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<Ndc>> {
        lookup_batch(&self.http, &ApiPath::v1(["ndc", "_batch"]), ndcs, options).await
    }
}
