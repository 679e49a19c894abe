use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::{ApiResponse, Meta};

#[derive(Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
}

pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}
