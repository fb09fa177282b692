use serde::{Deserialize, Serialize};

open_enum! {
    /// RxNorm term type (TTY).
    pub enum RxTermType {
        /// Ingredient
        In => "IN",
        /// Precise Ingredient
        Pin => "PIN",
        /// Multiple Ingredients
        Min => "MIN",
        /// Semantic Clinical Drug Component
        Scdc => "SCDC",
        /// Semantic Clinical Drug Form
        Scdf => "SCDF",
        /// Semantic Clinical Dose Form Group
        Scdg => "SCDG",
        /// Semantic Clinical Drug
        Scd => "SCD",
        /// Generic Pack
        Gpck => "GPCK",
        /// Brand Name
        Bn => "BN",
        /// Semantic Branded Drug Component
        Sbdc => "SBDC",
        /// Semantic Branded Drug Form
        Sbdf => "SBDF",
        /// Semantic Branded Dose Form Group
        Sbdg => "SBDG",
        /// Semantic Branded Drug
        Sbd => "SBD",
        /// Brand Name Pack
        Bpck => "BPCK",
        /// Prescribable Name
        Psn => "PSN",
        /// Synonym
        Sy => "SY",
        /// Tall Man Lettering Synonym
        Tmsy => "TMSY",
        /// Dose Form
        Df => "DF",
        /// Entry Term
        Et => "ET",
        /// Dose Form Group
        Dfg => "DFG",
    }
}

/// Reference to another RxNorm concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxConceptRef {
    pub rxcui: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxRelatedConcept {
    pub rxcui: String,
    pub name: String,
    pub tty: RxTermType,
    pub relation: String,
}

/// RxNorm concept record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxNorm {
    pub rxcui: String,
    pub name: String,
    pub tty: RxTermType,
    pub display: Option<String>,

    // standard
    pub synonym: Option<String>,
    pub suppress: Option<String>,
    pub language: Option<String>,
    pub prescribable: Option<bool>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub ingredients: Vec<RxConceptRef>,

    // full
    pub dose_form: Option<RxConceptRef>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub brands: Vec<RxConceptRef>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub related: Vec<RxRelatedConcept>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub ndcs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_type_wire_names() {
        let tty: RxTermType = serde_json::from_str(r#""SCD""#).unwrap();
        assert_eq!(tty, RxTermType::Scd);
        assert_eq!(serde_json::to_string(&RxTermType::Tmsy).unwrap(), r#""TMSY""#);
    }

    #[test]
    fn test_unrecognised_term_type_survives_reencoding() {
        let rx: RxNorm =
            serde_json::from_str(r#"{"rxcui": "1", "name": "x", "tty": "SCDGP"}"#).unwrap();
        assert_eq!(rx.tty, RxTermType::Other("SCDGP".to_string()));
        assert_eq!(rx.tty.to_string(), "SCDGP");

        let json = serde_json::to_string(&rx).unwrap();
        assert!(json.contains(r#""tty":"SCDGP""#));
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let rx: RxNorm = serde_json::from_str(
            r#"{"rxcui": "83367", "name": "atorvastatin", "tty": "IN", "ingredients": null, "ndcs": null}"#,
        )
        .unwrap();
        assert!(rx.ingredients.is_empty());
        assert!(rx.ndcs.is_empty());
    }

    #[test]
    fn test_full_shape() {
        let rx: RxNorm = serde_json::from_str(
            r#"{
                "rxcui": "213169",
                "name": "atorvastatin 10 MG Oral Tablet [Lipitor]",
                "tty": "SBD",
                "prescribable": true,
                "ingredients": [{"rxcui": "83367", "name": "atorvastatin"}],
                "dose_form": {"rxcui": "317541", "name": "Oral Tablet"},
                "related": [{"rxcui": "617310", "name": "atorvastatin 10 MG Oral Tablet", "tty": "SCD", "relation": "tradename_of"}],
                "ndcs": ["00071015523"]
            }"#,
        )
        .unwrap();

        assert_eq!(rx.tty, RxTermType::Sbd);
        assert_eq!(rx.ingredients[0].name, "atorvastatin");
        assert_eq!(rx.related[0].tty, RxTermType::Scd);
        assert!(rx.brands.is_empty());
    }
}
