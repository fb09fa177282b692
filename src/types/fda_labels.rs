use serde::{Deserialize, Serialize};

/// Marketing category filter for label searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FdaProductType {
    Otc,
    Rx,
}

impl std::str::FromStr for FdaProductType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "otc" => Ok(FdaProductType::Otc),
            "rx" => Ok(FdaProductType::Rx),
            _ => Err(crate::Error::validation(format!(
                "Unknown product type: {}. Expected otc or rx.",
                s
            ))),
        }
    }
}

/// FDA Structured Product Label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdaLabel {
    pub set_id: String,
    pub product_name: String,
    pub labeler_name: String,
    pub display: Option<String>,

    // standard
    pub version: Option<i64>,
    pub effective_time: Option<String>,
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub route: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub substance_name: Vec<String>,
    pub indications_and_usage: Option<String>,
    pub dosage_and_administration: Option<String>,

    // full
    pub spl_id: Option<String>,
    pub document_type: Option<String>,
    pub warnings: Option<String>,
    pub precautions: Option<String>,
    pub contraindications: Option<String>,
    pub adverse_reactions: Option<String>,
    pub drug_interactions: Option<String>,
    pub overdosage: Option<String>,
    pub clinical_pharmacology: Option<String>,
    pub mechanism_of_action: Option<String>,
    pub pharmacodynamics: Option<String>,
    pub pharmacokinetics: Option<String>,
    pub how_supplied: Option<String>,
    pub storage_and_handling: Option<String>,
    pub boxed_warning: Option<String>,
    pub pregnancy: Option<String>,
    pub nursing_mothers: Option<String>,
    pub pediatric_use: Option<String>,
    pub geriatric_use: Option<String>,
}

/// Filters for the label search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FdaLabelSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<FdaProductType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl FdaLabelSearchParams {
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn substance(mut self, substance: impl Into<String>) -> Self {
        self.substance = Some(substance.into());
        self
    }

    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn product_type(mut self, product_type: FdaProductType) -> Self {
        self.product_type = Some(product_type);
        self
    }

    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_with_list_fields() {
        let label: FdaLabel = serde_json::from_str(
            r#"{
                "set_id": "c2a9cb5b-1b0d-4c4b-9c3e-000000000000",
                "product_name": "Advil",
                "labeler_name": "Haleon US Holdings LLC",
                "version": 12,
                "route": ["ORAL"],
                "substance_name": ["IBUPROFEN"]
            }"#,
        )
        .unwrap();

        assert_eq!(label.version, Some(12));
        assert_eq!(label.route, vec!["ORAL"]);
        assert!(label.boxed_warning.is_none());
    }

    #[test]
    fn test_search_params_serialize() {
        let params = FdaLabelSearchParams::default()
            .substance("acetaminophen")
            .product_type(FdaProductType::Otc);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({"substance": "acetaminophen", "product_type": "otc"})
        );
    }
}
