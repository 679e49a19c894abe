use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::DiscountType;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CreateDiscountRequest {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: DiscountType,
    pub value: u32,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
}
