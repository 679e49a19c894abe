use super::ApiClient;
use crate::{
    error::ClientResult,
    models::{DashboardSummary, OrderRecord},
    response::{normalize_entity, normalize_list},
};

impl ApiClient {
    pub async fn dashboard_summary(&self) -> ClientResult<DashboardSummary> {
        let body = self.get_json("/seller/dashboard").await?;
        if body.is_null() {
            return Ok(DashboardSummary::default());
        }
        normalize_entity(body, "summary")
    }

    pub async fn seller_orders(&self) -> ClientResult<Vec<OrderRecord>> {
        let body = self.get_json("/seller/orders").await?;
        normalize_list(body, "orders")
    }
}
