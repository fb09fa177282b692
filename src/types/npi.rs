use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Individual,
    Organization,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NpiAddress {
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub telephone: Option<String>,
    pub fax: Option<String>,
}

/// Provider specialty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpiTaxonomy {
    pub code: String,
    pub description: Option<String>,
    pub primary: Option<bool>,
    pub state: Option<String>,
    pub license: Option<String>,
}

/// A non-NPI identifier held by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpiIdentifier {
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub state: Option<String>,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpiOtherName {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// National Provider Identifier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npi {
    pub npi: String,
    pub entity_type: EntityType,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_name: Option<String>,
    pub display: Option<String>,

    // standard
    pub credential: Option<String>,
    pub gender: Option<String>,
    pub sole_proprietor: Option<bool>,
    pub enumeration_date: Option<String>,
    pub last_updated: Option<String>,
    pub status: Option<String>,
    pub primary_taxonomy: Option<NpiTaxonomy>,
    pub practice_address: Option<NpiAddress>,

    // full
    pub mailing_address: Option<NpiAddress>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub taxonomies: Vec<NpiTaxonomy>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub identifiers: Vec<NpiIdentifier>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub other_names: Vec<NpiOtherName>,
    pub deactivation_date: Option<String>,
    pub reactivation_date: Option<String>,
}

impl Npi {
    pub fn is_individual(&self) -> bool {
        self.entity_type == EntityType::Individual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_individual_provider() {
        let npi: Npi = serde_json::from_str(
            r#"{
                "npi": "1234567893",
                "entity_type": "individual",
                "name": "JANE DOE",
                "first_name": "JANE",
                "last_name": "DOE",
                "primary_taxonomy": {"code": "207R00000X", "description": "Internal Medicine", "primary": true},
                "identifiers": [{"identifier": "X123", "type": "MEDICAID", "state": "CA"}]
            }"#,
        )
        .unwrap();

        assert!(npi.is_individual());
        assert_eq!(npi.primary_taxonomy.unwrap().code, "207R00000X");
        assert_eq!(npi.identifiers[0].kind.as_deref(), Some("MEDICAID"));
    }

    #[test]
    fn test_organization_provider() {
        let npi: Npi = serde_json::from_str(
            r#"{"npi": "1003000126", "entity_type": "organization", "name": "ACME CLINIC", "organization_name": "ACME CLINIC"}"#,
        )
        .unwrap();

        assert!(!npi.is_individual());
        assert!(npi.taxonomies.is_empty());
    }

    #[test]
    fn test_unknown_entity_type_is_rejected() {
        let result: Result<Npi, _> = serde_json::from_str(
            r#"{"npi": "1", "entity_type": "robot", "name": "X"}"#,
        );
        assert!(result.is_err());
    }
}
