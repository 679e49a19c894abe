use axum::{Json, Router, extract::State, routing::get};

use crate::{
    models::Category,
    response::{ApiResponse, Meta},
    sandbox::state::SandboxState,
};

pub fn router() -> Router<SandboxState> {
    Router::new().route("/", get(list_categories))
}

pub async fn list_categories(State(state): State<SandboxState>) -> Json<ApiResponse<Vec<Category>>> {
    let categories = state.store.read().await.categories.clone();
    let total = categories.len() as i64;
    Json(ApiResponse::success(
        "Categories",
        categories,
        Some(Meta::new(1, total, total)),
    ))
}
