use super::{code_path, lookup_batch};
use crate::error::Result;
use crate::http::{ApiPath, HttpClient};
use crate::types::{
    ApiResponse, BatchLookupOptions, BatchResponse, FdaLabel, FdaLabelSearchParams, LookupOptions,
    SearchOptions, SearchResponse,
};

/// FDA structured product labels.
#[derive(Clone)]
pub struct FdaLabelsEndpoint {
    http: HttpClient,
}

impl FdaLabelsEndpoint {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Looks up a label by its SPL set id.
    #[tracing::instrument(skip(self, options))]
    pub async fn lookup(
        &self,
        set_id: &str,
        options: Option<&LookupOptions>,
    ) -> Result<ApiResponse<FdaLabel>> {
        let path = code_path(ApiPath::v1(["fda-labels"]), set_id)?;
        self.http.get(&path, options).await
    }

    /// Looks up the label of the product an NDC belongs to.
    #[tracing::instrument(skip(self, options))]
    pub async fn lookup_by_ndc(
        &self,
        ndc: &str,
        options: Option<&LookupOptions>,
    ) -> Result<ApiResponse<FdaLabel>> {
        let path = code_path(ApiPath::v1(["fda-labels", "ndc"]), ndc)?;
        self.http.get(&path, options).await
    }

    #[tracing::instrument(skip(self, set_ids, options), fields(count = set_ids.len()))]
    pub async fn lookup_many<S: AsRef<str>>(
        &self,
        set_ids: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<FdaLabel>> {
        lookup_batch(&self.http, &ApiPath::v1(["fda-labels", "_batch"]), set_ids, options).await
    }

    /// Full-text and field search over labels.
    ///
    /// Note the singular `fda-label` in this route.
    #[tracing::instrument(skip(self, options))]
    pub async fn search(
        &self,
        params: &FdaLabelSearchParams,
        options: Option<&SearchOptions>,
    ) -> Result<SearchResponse<FdaLabel>> {
        self.http
            .search(&ApiPath::v1(["fda-label", "search"]), params, options)
            .await
    }
}
