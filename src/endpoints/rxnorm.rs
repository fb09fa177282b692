use super::{code_path, lookup_batch};
use crate::error::Result;
use crate::http::{ApiPath, HttpClient};
use crate::types::{ApiResponse, BatchLookupOptions, BatchResponse, LookupOptions, RxNorm};

/// RxNorm concepts, keyed by RxCUI.
#[derive(Clone)]
pub struct RxNormEndpoint {
    http: HttpClient,
}

impl RxNormEndpoint {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn lookup(
        &self,
        rxcui: &str,
        options: Option<&LookupOptions>,
    ) -> Result<ApiResponse<RxNorm>> {
        let path = code_path(ApiPath::v1(["rxnorm"]), rxcui)?;
        self.http.get(&path, options).await
    }

    #[tracing::instrument(skip(self, rxcuis, options), fields(count = rxcuis.len()))]
    pub async fn lookup_many<S: AsRef<str>>(
        &self,
        rxcuis: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<RxNorm>> {
        lookup_batch(&self.http, &ApiPath::v1(["rxnorm", "_batch"]), rxcuis, options).await
    }
}
