use serde::{Deserialize, Serialize};

/// LOINC laboratory or clinical observation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loinc {
    pub loinc_num: String,
    pub long_common_name: String,
    pub component: String,
    pub display: Option<String>,

    // standard
    pub short_name: Option<String>,
    pub class: Option<String>,
    pub class_type: Option<i64>,
    pub property: Option<String>,
    pub time_aspect: Option<String>,
    pub system: Option<String>,
    pub scale_type: Option<String>,
    pub method_type: Option<String>,
    pub status: Option<String>,
    pub order_obs: Option<String>,

    // full
    pub definition_description: Option<String>,
    pub consumer_name: Option<String>,
    pub survey_question_text: Option<String>,
    pub survey_question_source: Option<String>,
    pub units_required: Option<String>,
    pub submitted_units: Option<String>,
    pub related_names_2: Option<String>,
    pub example_units: Option<String>,
    pub example_ucum_units: Option<String>,
    pub example_si_ucum_units: Option<String>,
    pub status_reason: Option<String>,
    pub status_text: Option<String>,
    pub change_reason_public: Option<String>,
    pub common_test_rank: Option<i64>,
    pub common_order_rank: Option<i64>,
    pub hl7_field_subfield_id: Option<String>,
    pub external_copyright_notice: Option<String>,
    pub panel_type: Option<String>,
    pub ask_at_order_entry: Option<String>,
    pub associated_observations: Option<String>,
    pub version_first_released: Option<String>,
    pub version_last_changed: Option<String>,
}
