//! One endpoint per code system. Each method maps to a single route.

mod cvx;
mod fda_labels;
mod icd10;
mod loinc;
mod mvx;
mod ndc;
mod npi;
mod rxnorm;

pub use cvx::CvxEndpoint;
pub use fda_labels::FdaLabelsEndpoint;
pub use icd10::Icd10Endpoint;
pub use loinc::LoincEndpoint;
pub use mvx::MvxEndpoint;
pub use ndc::NdcEndpoint;
pub use npi::NpiEndpoint;
pub use rxnorm::RxNormEndpoint;

use log::debug;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::http::{ApiPath, HttpClient};
use crate::types::{BatchLookupOptions, BatchRequest, BatchResponse, MAX_BATCH_SIZE};

/// Appends a caller-supplied code to `base`, rejecting blank codes.
fn code_path(base: ApiPath, code: &str) -> Result<ApiPath> {
    let code = code.trim();
    if code.is_empty() {
        return Err(Error::validation("Code must not be empty"));
    }
    Ok(base.join(code))
}

/// Posts `codes` to a `_batch` route in chunks and merges the answers.
async fn lookup_batch<T, S>(
    http: &HttpClient,
    path: &ApiPath,
    codes: &[S],
    options: Option<&BatchLookupOptions>,
) -> Result<BatchResponse<T>>
where
    T: DeserializeOwned,
    S: AsRef<str>,
{
    if codes.is_empty() {
        return Err(Error::validation("At least one code is required"));
    }
    if let Some(index) = codes.iter().position(|c| c.as_ref().trim().is_empty()) {
        return Err(Error::validation(format!("Code at index {} is empty", index)));
    }

    let batch_size = options.map_or_else(
        || BatchLookupOptions::default().effective_batch_size(),
        BatchLookupOptions::effective_batch_size,
    );
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(Error::validation(format!(
            "Batch size must be between 1 and {}, got {}",
            MAX_BATCH_SIZE, batch_size
        )));
    }

    let lookup = options.map(|o| &o.lookup);
    let chunks = codes.chunks(batch_size);
    let total_chunks = chunks.len();
    let mut merged: Option<BatchResponse<T>> = None;

    for (index, chunk) in chunks.enumerate() {
        debug!(
            "{}: sending chunk {}/{} ({} codes)",
            path,
            index + 1,
            total_chunks,
            chunk.len()
        );
        let body = BatchRequest {
            codes: chunk.iter().map(|c| c.as_ref().trim()).collect(),
        };
        let response: BatchResponse<T> = http.post(path, &body, lookup).await?;
        match merged.as_mut() {
            Some(all) => all.merge(response),
            None => merged = Some(response),
        }
    }

    merged.ok_or_else(|| Error::validation("At least one code is required"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use reqwest::{Client, Url};

    use crate::http::{HttpClient, RetryPolicy, StaticToken};

    pub fn http_for(url: &str) -> HttpClient {
        HttpClient::new(
            Client::new(),
            Url::parse(url).unwrap(),
            Arc::new(StaticToken::new("test-key")),
            RetryPolicy::new(0, Duration::from_millis(1)),
            Duration::from_secs(5),
        )
    }

    pub const META: &str =
        r#"{"legal": {"license": "public-domain"}, "shape": "standard", "api_version": "v1"}"#;

    /// Batch response body for `codes`, every code found with `{"id": code}`.
    pub fn batch_body(codes: &[&str]) -> String {
        let results: Vec<String> = codes
            .iter()
            .map(|c| format!(r#"{{"code": "{c}", "found": true, "data": {{"id": "{c}"}}}}"#))
            .collect();
        format!(
            r#"{{"results": [{}], "meta": {{"legal": {{"license": "public-domain"}}, "shape": "standard", "api_version": "v1", "total": {n}, "found": {n}, "not_found": 0}}}}"#,
            results.join(","),
            n = codes.len()
        )
    }
}
