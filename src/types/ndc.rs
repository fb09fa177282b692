use serde::{Deserialize, Serialize};

/// Active ingredient in a drug product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveIngredient {
    pub name: String,
    pub strength: Option<String>,
    pub unit: Option<String>,
}

/// One package configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdcPackaging {
    pub ndc: String,
    pub description: Option<String>,
    pub package_ndc: Option<String>,
}

/// National Drug Code record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ndc {
    pub ndc: String,
    pub ndc11: String,
    pub product_name: String,
    pub labeler_name: String,
    pub display: Option<String>,

    // standard
    pub generic_name: Option<String>,
    pub dosage_form: Option<String>,
    pub route: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub active_ingredients: Vec<ActiveIngredient>,
    pub dea_schedule: Option<String>,
    pub marketing_status: Option<String>,

    // full
    pub application_number: Option<String>,
    pub product_type: Option<String>,
    pub marketing_start_date: Option<String>,
    pub marketing_end_date: Option<String>,
    pub listing_expiration_date: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub pharm_class: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub packaging: Vec<NdcPackaging>,
}
