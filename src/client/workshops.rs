use reqwest::Method;

use super::{ApiClient, segment};
use crate::{
    dto::upload::UploadForm,
    error::ClientResult,
    models::{ResourceId, Workshop},
    response::{normalize_entity, normalize_list},
};

impl ApiClient {
    pub async fn list_workshops(&self) -> ClientResult<Vec<Workshop>> {
        let body = self.get_json("/seller/workshops").await?;
        normalize_list(body, "workshops")
    }

    pub async fn create_workshop(&self, upload: UploadForm) -> ClientResult<Workshop> {
        let body = self
            .send_multipart(Method::POST, "/seller/workshops", upload)
            .await?;
        normalize_entity(body, "workshop")
    }

    pub async fn delete_workshop(&self, id: &ResourceId) -> ClientResult<()> {
        let path = format!("/seller/workshops/{}", segment(id.as_str()));
        self.send_empty(Method::DELETE, &path).await?;
        Ok(())
    }
}
