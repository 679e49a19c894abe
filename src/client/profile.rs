use reqwest::Method;

use super::ApiClient;
use crate::{
    dto::profile::UpdateProfileRequest, error::ClientResult, models::SellerProfile,
    response::normalize_entity,
};

impl ApiClient {
    pub async fn get_profile(&self) -> ClientResult<SellerProfile> {
        let body = self.get_json("/users/profile").await?;
        normalize_entity(body, "user")
    }

    pub async fn update_profile(
        &self,
        payload: &UpdateProfileRequest,
    ) -> ClientResult<SellerProfile> {
        let body = self
            .send_json(Method::PUT, "/users/profile", Some(payload))
            .await?;
        normalize_entity(body, "user")
    }

    pub async fn deactivate_account(&self) -> ClientResult<()> {
        self.send_empty(Method::POST, "/users/deactivate").await?;
        Ok(())
    }

    pub async fn delete_account(&self) -> ClientResult<()> {
        self.send_empty(Method::DELETE, "/users/profile").await?;
        Ok(())
    }
}
