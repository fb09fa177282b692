use super::{code_path, lookup_batch};
use crate::error::{Error, Result};
use crate::http::{ApiPath, HttpClient};
use crate::types::{ApiResponse, BatchLookupOptions, BatchResponse, LookupOptions, Npi};

/// National Provider Identifiers.
#[derive(Clone)]
pub struct NpiEndpoint {
    http: HttpClient,
}

impl NpiEndpoint {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Looks up a 10-digit NPI.
    ///
    /// Identifiers that are not ten digits are rejected before any request is sent.
    #[tracing::instrument(skip(self, options))]
    pub async fn lookup(&self, npi: &str, options: Option<&LookupOptions>) -> Result<ApiResponse<Npi>> {
        check_npi(npi.trim())?;
        let path = code_path(ApiPath::v1(["npi"]), npi)?;
        self.http.get(&path, options).await
    }

    #[tracing::instrument(skip(self, npis, options), fields(count = npis.len()))]
    pub async fn lookup_many<S: AsRef<str>>(
        &self,
        npis: &[S],
        options: Option<&BatchLookupOptions>,
    ) -> Result<BatchResponse<Npi>> {
        lookup_batch(&self.http, &ApiPath::v1(["npi", "_batch"]), npis, options).await
    }
}

fn check_npi(npi: &str) -> Result<()> {
    if npi.is_empty() {
        return Err(Error::validation("Code must not be empty"));
    }
    if npi.len() != 10 || !npi.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::validation(format!(
            "Invalid NPI '{}': expected 10 digits",
            npi
        )));
    }
    Ok(())
}
