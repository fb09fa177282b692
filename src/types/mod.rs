//! Request options and response records shared by every code system.
//!
//! Each code system has its own module with a single record type. The
//! compact fields are required. Fields added by the `standard` and `full`
//! shapes are optional, because the shape requested decides which are present.

/// Declares a string enum that keeps values it does not recognise in
/// `Other`, so they survive a decode and re-encode unchanged.
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
            /// Any other value, as sent by the service.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)*
                    Self::Other(value) => value.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                let known = match value.as_str() {
                    $($wire => Some(Self::$variant),)*
                    _ => None,
                };
                known.unwrap_or(Self::Other(value))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(value) => value,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod cvx;
mod fda_labels;
mod icd10;
mod loinc;
mod mvx;
mod ndc;
mod npi;
mod rxnorm;

pub use cvx::{Cvx, CvxStatus};
pub use fda_labels::{FdaLabel, FdaLabelSearchParams, FdaProductType};
pub use icd10::{Icd10, Icd10SearchParams, Icd10System, Icd10Type};
pub use loinc::Loinc;
pub use mvx::{Mvx, MvxStatus, MvxVaccine};
pub use ndc::{ActiveIngredient, Ndc, NdcPackaging};
pub use npi::{EntityType, Npi, NpiAddress, NpiIdentifier, NpiOtherName, NpiTaxonomy};
pub use rxnorm::{RxConceptRef, RxNorm, RxRelatedConcept, RxTermType};

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default number of codes sent per batch request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Largest batch the service accepts.
pub const MAX_BATCH_SIZE: usize = 500;

/// How much detail the service returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    Compact,
    #[default]
    Standard,
    Full,
}

impl ResponseShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseShape::Compact => "compact",
            ResponseShape::Standard => "standard",
            ResponseShape::Full => "full",
        }
    }
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseShape {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(ResponseShape::Compact),
            "standard" => Ok(ResponseShape::Standard),
            "full" => Ok(ResponseShape::Full),
            _ => Err(crate::Error::validation(format!(
                "Unknown response shape: {}. Expected compact, standard, or full.",
                s
            ))),
        }
    }
}

/// Extra fields the service can add to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeOption {
    /// A pre-formatted `display` string.
    Display,
}

impl IncludeOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncludeOption::Display => "display",
        }
    }
}

/// Options accepted by every single-code lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub shape: Option<ResponseShape>,
    pub include: Vec<IncludeOption>,
}

impl LookupOptions {
    pub fn shape(shape: ResponseShape) -> Self {
        Self {
            shape: Some(shape),
            include: Vec::new(),
        }
    }

    pub fn with_include(mut self, include: IncludeOption) -> Self {
        if !self.include.contains(&include) {
            self.include.push(include);
        }
        self
    }

    /// Query pairs sent with the request; empty when nothing is set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(shape) = self.shape {
            pairs.push(("shape", shape.as_str().to_string()));
        }
        if !self.include.is_empty() {
            let include: Vec<&str> = self.include.iter().map(IncludeOption::as_str).collect();
            pairs.push(("include", include.join(",")));
        }
        pairs
    }
}

/// Options for batch lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchLookupOptions {
    pub lookup: LookupOptions,
    /// Codes per request. Defaults to [`DEFAULT_BATCH_SIZE`], at most [`MAX_BATCH_SIZE`].
    pub batch_size: Option<usize>,
}

impl BatchLookupOptions {
    pub fn batch_size(size: usize) -> Self {
        Self {
            lookup: LookupOptions::default(),
            batch_size: Some(size),
        }
    }

    pub fn with_shape(mut self, shape: ResponseShape) -> Self {
        self.lookup.shape = Some(shape);
        self
    }

    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }
}

/// Paging and shape options for searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub shape: Option<ResponseShape>,
    pub include: Vec<IncludeOption>,
}

impl SearchOptions {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        let lookup = LookupOptions {
            shape: self.shape,
            include: self.include.clone(),
        };
        pairs.extend(lookup.query_pairs());
        pairs
    }
}

/// Licensing terms attached to every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalInfo {
    pub license: String,
    pub attribution: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub legal: LegalInfo,
    pub shape: ResponseShape,
    pub api_version: String,
}

/// Envelope of a single-code lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ResponseMeta,
}

/// One entry of a batch response; `data` is set only when `found`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResultItem<T> {
    pub code: String,
    pub found: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMeta {
    #[serde(flatten)]
    pub response: ResponseMeta,
    pub total: u64,
    pub found: u64,
    pub not_found: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse<T> {
    pub results: Vec<BatchResultItem<T>>,
    pub meta: BatchMeta,
}

impl<T> BatchResponse<T> {
    /// Appends the results of a later chunk, summing the counters.
    pub fn merge(&mut self, other: BatchResponse<T>) {
        self.results.extend(other.results);
        self.meta.total += other.meta.total;
        self.meta.found += other.meta.found;
        self.meta.not_found += other.meta.not_found;
    }

    /// Records that were found, in request order.
    pub fn found(&self) -> impl Iterator<Item = &T> {
        self.results.iter().filter_map(|item| item.data.as_ref())
    }

    /// Codes the service did not know.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|item| !item.found)
            .map(|item| item.code.as_str())
    }
}

/// One bucket of a search facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// Envelope of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, deserialize_with = "lenient_facets")]
    pub facets: BTreeMap<String, Vec<FacetCount>>,
    pub meta: Option<ResponseMeta>,
}

fn first_page() -> u32 {
    1
}

/// Reads an optional list field, treating `null` like an absent field.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Facets in any other layout are dropped rather than failing the search.
fn lenient_facets<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<FacetCount>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(BTreeMap::new());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        warn!("Ignoring search facets in an unexpected format: {}", e);
        BTreeMap::new()
    }))
}

/// Body of a batch request.
#[derive(Debug, Serialize)]
pub(crate) struct BatchRequest<'a> {
    pub codes: Vec<&'a str>,
}
