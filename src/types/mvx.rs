use serde::{Deserialize, Serialize};

open_enum! {
    pub enum MvxStatus {
        Active => "Active",
        Inactive => "Inactive",
    }
}

/// A vaccine produced by a manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvxVaccine {
    pub cvx_code: String,
    pub vaccine_name: String,
}

/// MVX vaccine manufacturer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mvx {
    pub mvx_code: String,
    pub manufacturer_name: String,
    pub display: Option<String>,

    // standard
    pub notes: Option<String>,
    pub status: Option<MvxStatus>,
    pub last_updated: Option<String>,

    // full
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub vaccines: Vec<MvxVaccine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_shape_with_vaccines() {
        let mvx: Mvx = serde_json::from_str(
            r#"{
                "mvx_code": "PFR",
                "manufacturer_name": "Pfizer, Inc",
                "status": "Active",
                "vaccines": [{"cvx_code": "208", "vaccine_name": "COVID-19, mRNA, LNP-S, PF, 30 mcg/0.3 mL dose"}]
            }"#,
        )
        .unwrap();

        assert_eq!(mvx.status, Some(MvxStatus::Active));
        assert_eq!(mvx.vaccines[0].cvx_code, "208");
    }

    #[test]
    fn test_unrecognised_status_and_null_vaccines() {
        let mvx: Mvx = serde_json::from_str(
            r#"{"mvx_code": "XYZ", "manufacturer_name": "Acme", "status": "Retired", "vaccines": null}"#,
        )
        .unwrap();
        assert_eq!(mvx.status, Some(MvxStatus::Other("Retired".to_string())));
        assert!(mvx.vaccines.is_empty());
    }
}
