use std::fmt;
use std::io::Write;

use anyhow::{Context, Result, bail};
use log::debug;

use super::print_json;
use crate::Fhirfly;
use crate::types::{BatchLookupOptions, LookupOptions};

/// Code systems reachable from `fhirfly lookup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CodeSystem {
    Ndc,
    Npi,
    Rxnorm,
    Loinc,
    #[value(name = "icd10-cm")]
    Icd10Cm,
    #[value(name = "icd10-pcs")]
    Icd10Pcs,
    Cvx,
    Mvx,
    #[value(name = "fda-label")]
    FdaLabel,
    /// FDA label looked up by NDC; single code only.
    #[value(name = "fda-label-ndc")]
    FdaLabelNdc,
}

impl fmt::Display for CodeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodeSystem::Ndc => "ndc",
            CodeSystem::Npi => "npi",
            CodeSystem::Rxnorm => "rxnorm",
            CodeSystem::Loinc => "loinc",
            CodeSystem::Icd10Cm => "icd10-cm",
            CodeSystem::Icd10Pcs => "icd10-pcs",
            CodeSystem::Cvx => "cvx",
            CodeSystem::Mvx => "mvx",
            CodeSystem::FdaLabel => "fda-label",
            CodeSystem::FdaLabelNdc => "fda-label-ndc",
        };
        f.write_str(name)
    }
}

/// Looks up one code, or many codes through the batch route.
#[tracing::instrument(skip(client, codes, options, out))]
pub async fn lookup<W: Write>(
    client: &Fhirfly,
    system: CodeSystem,
    codes: &[String],
    options: &BatchLookupOptions,
    out: &mut W,
) -> Result<()> {
    match codes {
        [] => bail!("At least one code is required"),
        [code] => lookup_one(client, system, code, &options.lookup, out).await,
        _ => {
            debug!("Looking up {} {} codes", codes.len(), system);
            lookup_many(client, system, codes, options, out).await
        }
    }
}

async fn lookup_one<W: Write>(
    client: &Fhirfly,
    system: CodeSystem,
    code: &str,
    options: &LookupOptions,
    out: &mut W,
) -> Result<()> {
    let options = Some(options);
    let context = || format!("Failed to look up {} {}", system, code);
    match system {
        CodeSystem::Ndc => print_json(out, &client.ndc().lookup(code, options).await.with_context(context)?),
        CodeSystem::Npi => print_json(out, &client.npi().lookup(code, options).await.with_context(context)?),
        CodeSystem::Rxnorm => {
            print_json(out, &client.rxnorm().lookup(code, options).await.with_context(context)?)
        }
        CodeSystem::Loinc => {
            print_json(out, &client.loinc().lookup(code, options).await.with_context(context)?)
        }
        CodeSystem::Icd10Cm => {
            print_json(out, &client.icd10().lookup_cm(code, options).await.with_context(context)?)
        }
        CodeSystem::Icd10Pcs => {
            print_json(out, &client.icd10().lookup_pcs(code, options).await.with_context(context)?)
        }
        CodeSystem::Cvx => print_json(out, &client.cvx().lookup(code, options).await.with_context(context)?),
        CodeSystem::Mvx => print_json(out, &client.mvx().lookup(code, options).await.with_context(context)?),
        CodeSystem::FdaLabel => {
            print_json(out, &client.fda_labels().lookup(code, options).await.with_context(context)?)
        }
        CodeSystem::FdaLabelNdc => print_json(
            out,
            &client
                .fda_labels()
                .lookup_by_ndc(code, options)
                .await
                .with_context(context)?,
        ),
    }
}

async fn lookup_many<W: Write>(
    client: &Fhirfly,
    system: CodeSystem,
    codes: &[String],
    options: &BatchLookupOptions,
    out: &mut W,
) -> Result<()> {
    let options = Some(options);
    let context = || format!("Failed to look up {} {} codes", codes.len(), system);
    match system {
        CodeSystem::Ndc => print_json(out, &client.ndc().lookup_many(codes, options).await.with_context(context)?),
        CodeSystem::Npi => print_json(out, &client.npi().lookup_many(codes, options).await.with_context(context)?),
        CodeSystem::Rxnorm => {
            print_json(out, &client.rxnorm().lookup_many(codes, options).await.with_context(context)?)
        }
        CodeSystem::Loinc => {
            print_json(out, &client.loinc().lookup_many(codes, options).await.with_context(context)?)
        }
        CodeSystem::Icd10Cm => print_json(
            out,
            &client.icd10().lookup_cm_many(codes, options).await.with_context(context)?,
        ),
        CodeSystem::Icd10Pcs => print_json(
            out,
            &client.icd10().lookup_pcs_many(codes, options).await.with_context(context)?,
        ),
        CodeSystem::Cvx => print_json(out, &client.cvx().lookup_many(codes, options).await.with_context(context)?),
        CodeSystem::Mvx => print_json(out, &client.mvx().lookup_many(codes, options).await.with_context(context)?),
        CodeSystem::FdaLabel => print_json(
            out,
            &client.fda_labels().lookup_many(codes, options).await.with_context(context)?,
        ),
        CodeSystem::FdaLabelNdc => {
            bail!("fda-label-ndc accepts a single NDC; batch lookup by NDC is not available")
        }
    }
}
