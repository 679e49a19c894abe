use reqwest::Method;

use super::{ApiClient, segment};
use crate::{
    dto::{products::FeaturedToggleRequest, upload::UploadForm},
    error::ClientResult,
    models::{Category, Product, ResourceId},
    response::{normalize_entity, normalize_list},
};

impl ApiClient {
    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let body = self.get_json("/seller/products").await?;
        normalize_list(body, "products")
    }

    pub async fn list_featured_products(&self) -> ClientResult<Vec<Product>> {
        let body = self.get_json("/seller/products/featured").await?;
        normalize_list(body, "products")
    }

    pub async fn create_product(&self, upload: UploadForm) -> ClientResult<Product> {
        let body = self
            .send_multipart(Method::POST, "/seller/products", upload)
            .await?;
        normalize_entity(body, "product")
    }

    pub async fn delete_product(&self, id: &ResourceId) -> ClientResult<()> {
        let path = format!("/seller/products/{}", segment(id.as_str()));
        self.send_empty(Method::DELETE, &path).await?;
        Ok(())
    }

    pub async fn set_featured(&self, id: &ResourceId, is_featured: bool) -> ClientResult<Product> {
        let path = format!("/seller/products/{}/featured", segment(id.as_str()));
        let body = self
            .send_json(
                Method::PATCH,
                &path,
                Some(&FeaturedToggleRequest { is_featured }),
            )
            .await?;
        normalize_entity(body, "product")
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let body = self.get_json("/categories").await?;
        normalize_list(body, "categories")
    }
}
