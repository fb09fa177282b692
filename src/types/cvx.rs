use serde::{Deserialize, Serialize};

open_enum! {
    pub enum CvxStatus {
        Active => "Active",
        Inactive => "Inactive",
        NeverActive => "Never Active",
        Pending => "Pending",
    }
}

/// CVX vaccine code record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cvx {
    pub cvx_code: String,
    pub short_description: String,
    pub display: Option<String>,

    // standard
    pub full_vaccine_name: Option<String>,
    pub notes: Option<String>,
    pub status: Option<CvxStatus>,
    pub last_updated: Option<String>,

    // full
    pub vaccine_group: Option<String>,
    pub cdc_product_name: Option<String>,
    pub dose_number: Option<String>,
    pub forecast_vaccine_group: Option<String>,
}
