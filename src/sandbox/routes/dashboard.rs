use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{
    config::DEFAULT_COMMISSION_RATE,
    models::{DashboardSummary, OrderRecord},
    response::{ApiResponse, Meta},
    sandbox::{
        auth::{AuthUser, ensure_seller},
        error::AppResult,
        state::SandboxState,
    },
    screens::dashboard::estimate_summary,
};

#[derive(Serialize)]
pub struct OrderList {
    pub items: Vec<OrderRecord>,
}

pub fn router() -> Router<SandboxState> {
    Router::new()
        .route("/seller/dashboard", get(dashboard_summary))
        .route("/seller/orders", get(list_orders))
}

pub async fn dashboard_summary(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    ensure_seller(&user)?;
    let store = state.store.read().await;
    let summary = if store.publish_summary {
        DashboardSummary {
            estimated: false,
            ..estimate_summary(&store.orders, DEFAULT_COMMISSION_RATE)
        }
    } else {
        DashboardSummary::default()
    };

    Ok(Json(ApiResponse::success(
        "Dashboard",
        summary,
        Some(Meta::empty()),
    )))
}

pub async fn list_orders(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    ensure_seller(&user)?;
    let items = state.store.read().await.orders.clone();
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::new(1, total.max(1), total)),
    )))
}
