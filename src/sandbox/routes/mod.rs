use axum::Router;

use super::state::SandboxState;

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod discounts;
pub mod gateways;
pub mod health;
pub mod products;
pub mod profile;
pub mod uploads;
pub mod workshops;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<SandboxState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", catalog::router())
        .nest("/seller/products", products::router())
        .nest("/seller/discounts", discounts::router())
        .nest("/seller/workshops", workshops::router())
        .nest("/seller/payment-gateways", gateways::router())
        .merge(dashboard::router())
        .nest("/users", profile::router())
}
