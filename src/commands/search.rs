use std::io::Write;

use anyhow::{Context, Result, bail};

use super::print_json;
use crate::Fhirfly;
use crate::types::{FdaLabelSearchParams, Icd10SearchParams, SearchOptions};

/// Runs an ICD-10 search and prints the result page.
#[tracing::instrument(skip(client, out))]
pub async fn search_icd10<W: Write>(
    client: &Fhirfly,
    params: &Icd10SearchParams,
    options: &SearchOptions,
    out: &mut W,
) -> Result<()> {
    if params.is_empty() {
        bail!("Provide at least one search filter (--q, --code-system, --chapter or --billable)");
    }
    let response = client
        .icd10()
        .search(params, Some(options))
        .await
        .context("ICD-10 search failed")?;
    print_json(out, &response)
}

/// Runs an FDA label search and prints the result page.
#[tracing::instrument(skip(client, out))]
pub async fn search_fda_labels<W: Write>(
    client: &Fhirfly,
    params: &FdaLabelSearchParams,
    options: &SearchOptions,
    out: &mut W,
) -> Result<()> {
    if params.is_empty() {
        bail!("Provide at least one search filter, e.g. --q or --substance");
    }
    let response = client
        .fda_labels()
        .search(params, Some(options))
        .await
        .context("FDA label search failed")?;
    print_json(out, &response)
}
