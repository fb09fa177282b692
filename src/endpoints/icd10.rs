use super::{code_path, lookup_batch};
use crate::error::Result;
use crate::http::{ApiPath, HttpClient};
use crate::types::{
    ApiResponse, BatchLookupOptions, BatchResponse, Icd10, Icd10SearchParams, LookupOptions,
    SearchOptions, SearchResponse,
};

/// ICD-10-CM diagnosis and ICD-10-PCS procedure codes.
#[derive(Clone)]
pub struct Icd10Endpoint {
    http: HttpClient,
}

impl Icd10Endpoint {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Looks up a diagnosis code, e.g. `E11.9`.
    #[tracing::instrument(skip(self, options))]
    pub async fn lookup_cm(
        &self,
        code: &str,
        options: Option<&LookupOptions>,
    ) -> Result<ApiResponse<Icd10>> {
        let path = code_path(ApiPath::v1(["icd10", "cm"]), code)?;
        self.http.get(&path, options).await
    }

    /// Looks up a procedure code, e.g. `0BJ08ZZ`.
    #[tracing::instrument(skip(self, options))]
    pub async fn lookup_pcs(
        &self,
        code: &str,
        options: Option<&LookupOptions>,
    ) -> Result<ApiResponse<Icd10>> {
        let path = code_path(ApiPath::v1(["icd10", "pcs"]), code)?;
        self.http.get(&path, options).await
    }

    #[tracing::instrument(skip(self, codes, options), fields(count = codes.len()))]
    pub async fn lookup_cm_many<S: AsRef<str>>(
        &self,
        codes: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<Icd10>> {
        lookup_batch(&self.http, &ApiPath::v1(["icd10", "cm", "_batch"]), codes, options).await
    }

    #[tracing::instrument(skip(self, codes, options), fields(count = codes.len()))]
    pub async fn lookup_pcs_many<S: AsRef<str>>(
        &self,
        codes: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<Icd10>> {
        lookup_batch(&self.http, &ApiPath::v1(["icd10", "pcs", "_batch"]), codes, options).await
    }

    /// Searches both code sets. Results carry facets.
    #[tracing::instrument(skip(self, options))]
    pub async fn search(
        &self,
        params: &Icd10SearchParams,
        options: Option<&SearchOptions>,
    ) -> Result<SearchResponse<Icd10>> {
        self.http
            .search(&ApiPath::v1(["icd10", "search"]), params, options)
            .await
    }
}
