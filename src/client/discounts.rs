use reqwest::Method;

use super::{ApiClient, segment};
use crate::{
    dto::discounts::CreateDiscountRequest,
    error::ClientResult,
    models::{Discount, ResourceId},
    response::{normalize_entity, normalize_list},
};

impl ApiClient {
    pub async fn list_discounts(&self) -> ClientResult<Vec<Discount>> {
        let body = self.get_json("/seller/discounts").await?;
        normalize_list(body, "discounts")
    }

    pub async fn create_discount(&self, payload: &CreateDiscountRequest) -> ClientResult<Discount> {
        let body = self
            .send_json(Method::POST, "/seller/discounts", Some(payload))
            .await?;
        normalize_entity(body, "discount")
    }

    pub async fn disable_discount(&self, id: &ResourceId) -> ClientResult<Discount> {
        let path = format!("/seller/discounts/{}/disable", segment(id.as_str()));
        let body = self.send_empty(Method::PATCH, &path).await?;
        normalize_entity(body, "discount")
    }

    pub async fn delete_discount(&self, id: &ResourceId) -> ClientResult<()> {
        let path = format!("/seller/discounts/{}", segment(id.as_str()));
        self.send_empty(Method::DELETE, &path).await?;
        Ok(())
    }
}
