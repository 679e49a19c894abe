use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::SellerProfile;

/// Full replacement of the editable profile fields; `role` is never sent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub user_name: String,
    pub user_email: String,
    pub birthday: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
}

impl From<&SellerProfile> for UpdateProfileRequest {
    fn from(profile: &SellerProfile) -> Self {
        Self {
            user_name: profile.user_name.clone(),
            user_email: profile.user_email.clone(),
            birthday: profile.birthday,
            contact_number: profile.contact_number.clone(),
            address: profile.address.clone(),
        }
    }
}
