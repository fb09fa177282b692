use serde::{Deserialize, Serialize};

/// Which ICD-10 code set a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icd10Type {
    /// Clinical Modification (diagnoses)
    Cm,
    /// Procedure Coding System
    Pcs,
}

/// Code-set filter for searches. Upper-case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Icd10System {
    Cm,
    Pcs,
}

impl std::str::FromStr for Icd10System {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CM" => Ok(Icd10System::Cm),
            "PCS" => Ok(Icd10System::Pcs),
            _ => Err(crate::Error::validation(format!(
                "Unknown ICD-10 code system: {}. Expected CM or PCS.",
                s
            ))),
        }
    }
}

/// ICD-10-CM or ICD-10-PCS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icd10 {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: Icd10Type,
    pub description: String,
    pub display: Option<String>,

    // standard
    pub long_description: Option<String>,
    pub chapter: Option<String>,
    pub chapter_description: Option<String>,
    pub section: Option<String>,
    pub section_description: Option<String>,
    pub billable: Option<bool>,
    /// CM only.
    pub is_header: Option<bool>,
    /// PCS only.
    pub body_system: Option<String>,
    /// PCS only.
    pub root_operation: Option<String>,

    // full, CM only
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub includes: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub excludes1: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub excludes2: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub code_first: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub use_additional: Vec<String>,
    // full, PCS only
    pub approach: Option<String>,
    pub device: Option<String>,
    pub qualifier: Option<String>,
    pub effective_date: Option<String>,
    pub end_date: Option<String>,
}

/// Filters for `GET /v1/icd10/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Icd10SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_system: Option<Icd10System>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
}

impl Icd10SearchParams {
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn code_system(mut self, system: Icd10System) -> Self {
        self.code_system = Some(system);
        self
    }

    pub fn billable(mut self, billable: bool) -> Self {
        self.billable = Some(billable);
        self
    }

    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
