use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch},
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    dto::discounts::CreateDiscountRequest,
    models::{Discount, ResourceId},
    response::{ApiResponse, Meta},
    sandbox::{
        auth::{AuthUser, ensure_seller},
        error::{AppError, AppResult},
        state::SandboxState,
    },
    validation::{DISCOUNT_MAX, DISCOUNT_MIN, is_valid_discount_code},
};

pub fn router() -> Router<SandboxState> {
    Router::new()
        .route("/", get(list_discounts).post(create_discount))
        .route("/{id}", delete(delete_discount))
        .route("/{id}/disable", patch(disable_discount))
}

/// Answers with `{"discounts": [...]}`, the envelope this endpoint has always used.
pub async fn list_discounts(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    ensure_seller(&user)?;
    let discounts = state.store.read().await.discounts.clone();
    Ok(Json(json!({ "discounts": discounts })))
}

pub async fn create_discount(
    State(state): State<SandboxState>,
    user: AuthUser,
    Json(payload): Json<CreateDiscountRequest>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    ensure_seller(&user)?;
    if !is_valid_discount_code(&payload.code) {
        return Err(AppError::BadRequest(
            "Code must be 4-20 uppercase letters or digits".into(),
        ));
    }
    if !(DISCOUNT_MIN..=DISCOUNT_MAX).contains(&payload.value) {
        return Err(AppError::BadRequest(format!(
            "Discount value must be between {DISCOUNT_MIN} and {DISCOUNT_MAX}"
        )));
    }

    let mut store = state.store.write().await;
    if store.discounts.iter().any(|d| d.code == payload.code) {
        return Err(AppError::Conflict("Discount code already exists".into()));
    }

    let discount = Discount {
        id: Some(ResourceId::generate()),
        code: payload.code,
        kind: payload.kind,
        value: payload.value,
        usage_limit: payload.usage_limit,
        remaining_uses: payload.usage_limit,
        is_active: true,
        expires_at: payload.expires_at,
        created_at: Some(Utc::now()),
    };
    store.discounts.insert(0, discount.clone());
    tracing::info!(seller = %user.email, code = %discount.code, "discount created");

    Ok(Json(ApiResponse::success(
        "Discount created",
        discount,
        Some(Meta::empty()),
    )))
}

pub async fn disable_discount(
    State(state): State<SandboxState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    ensure_seller(&user)?;
    let id = ResourceId::new(id);
    let mut store = state.store.write().await;
    let discount = store
        .discounts
        .iter_mut()
        .find(|d| d.id.as_ref() == Some(&id))
        .ok_or(AppError::NotFound)?;
    discount.is_active = false;

    Ok(Json(ApiResponse::success(
        "Discount disabled",
        discount.clone(),
        Some(Meta::empty()),
    )))
}

pub async fn delete_discount(
    State(state): State<SandboxState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    ensure_seller(&user)?;
    let id = ResourceId::new(id);
    let mut store = state.store.write().await;
    let before = store.discounts.len();
    store.discounts.retain(|d| d.id.as_ref() != Some(&id));
    if store.discounts.len() == before {
        return Err(AppError::NotFound);
    }

    Ok(Json(ApiResponse::success(
        "Discount deleted",
        json!({}),
        Some(Meta::empty()),
    )))
}
