use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{delete, get, patch},
};
use chrono::Utc;
use serde_json::Value;

use super::uploads::parse_multipart;
use crate::{
    dto::products::{FeaturedToggleRequest, fields},
    models::{Product, ProductStatus, ResourceId},
    response::{ApiResponse, Meta},
    sandbox::{
        auth::{AuthUser, ensure_seller},
        error::{AppError, AppResult},
        state::SandboxState,
    },
};

pub fn router() -> Router<SandboxState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/featured", get(list_featured))
        .route("/{id}", delete(delete_product))
        .route("/{id}/featured", patch(set_featured))
}

pub async fn list_products(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    ensure_seller(&user)?;
    let items = state.store.read().await.products.clone();
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        "Products",
        items,
        Some(Meta::new(1, total.max(1), total)),
    )))
}

/// Bare array, unlike the main listing.
pub async fn list_featured(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Product>>> {
    ensure_seller(&user)?;
    let items = state
        .store
        .read()
        .await
        .products
        .iter()
        .filter(|p| p.is_featured)
        .cloned()
        .collect();
    Ok(Json(items))
}

pub async fn create_product(
    State(state): State<SandboxState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    ensure_seller(&user)?;
    let upload = parse_multipart(multipart).await?;

    let name = upload
        .text(fields::NAME)
        .ok_or_else(|| AppError::BadRequest("Product name is required".into()))?
        .to_string();
    let price = parse_non_negative(upload.text(fields::PRICE), "price")?;
    let stock_quantity = parse_non_negative(upload.text(fields::STOCK), "stock_quantity")?;
    let tags = match upload.text(fields::TAGS) {
        Some(raw) => serde_json::from_str::<Vec<String>>(raw)
            .map_err(|_| AppError::BadRequest("tags must be a JSON array of strings".into()))?,
        None => Vec::new(),
    };
    let status = match upload.text(fields::STATUS) {
        Some("published") => ProductStatus::Published,
        Some("draft") | None => ProductStatus::Draft,
        Some(other) => return Err(AppError::BadRequest(format!("Unknown status `{other}`"))),
    };

    let product = Product {
        id: Some(ResourceId::generate()),
        name,
        description: upload.text(fields::DESCRIPTION).map(str::to_string),
        price,
        stock_quantity,
        category: upload.text(fields::CATEGORY).map(str::to_string),
        tags,
        image_url: upload.url_for(fields::MAIN_IMAGE),
        additional_images: upload.urls_for(fields::ADDITIONAL_IMAGES),
        video_url: upload.url_for(fields::VIDEO),
        status,
        is_featured: false,
        created_at: Some(Utc::now()),
    };

    state.store.write().await.products.insert(0, product.clone());
    tracing::info!(seller = %user.email, name = %product.name, "product created");

    Ok(Json(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    )))
}

pub async fn delete_product(
    State(state): State<SandboxState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    ensure_seller(&user)?;
    let id = ResourceId::new(id);
    let mut store = state.store.write().await;
    let before = store.products.len();
    store.products.retain(|p| p.id.as_ref() != Some(&id));
    if store.products.len() == before {
        return Err(AppError::NotFound);
    }

    Ok(Json(ApiResponse::success(
        "Product deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

pub async fn set_featured(
    State(state): State<SandboxState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<FeaturedToggleRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    ensure_seller(&user)?;
    let id = ResourceId::new(id);
    let mut store = state.store.write().await;
    let product = store
        .products
        .iter_mut()
        .find(|p| p.id.as_ref() == Some(&id))
        .ok_or(AppError::NotFound)?;
    product.is_featured = payload.is_featured;

    Ok(Json(ApiResponse::success(
        "Featured flag updated",
        product.clone(),
        Some(Meta::empty()),
    )))
}

fn parse_non_negative(raw: Option<&str>, field: &str) -> AppResult<i64> {
    let value = raw
        .unwrap_or("0")
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a whole number")))?;
    if value < 0 {
        return Err(AppError::BadRequest(format!("{field} cannot be negative")));
    }
    Ok(value)
}
