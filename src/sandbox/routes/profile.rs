use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::{
    dto::profile::UpdateProfileRequest,
    models::SellerProfile,
    response::{ApiResponse, Meta},
    sandbox::{
        auth::AuthUser,
        error::{AppError, AppResult},
        state::SandboxState,
    },
};

pub fn router() -> Router<SandboxState> {
    Router::new()
        .route(
            "/profile",
            get(get_profile).put(update_profile).delete(delete_account),
        )
        .route("/deactivate", post(deactivate))
}

pub async fn get_profile(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SellerProfile>>> {
    let store = state.store.read().await;
    let account = store.accounts.get(&user.email).ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success(
        "Profile",
        account.profile.clone(),
        Some(Meta::empty()),
    )))
}

/// Full replacement of the editable fields. The account stays keyed by the
/// email it signed in with.
pub async fn update_profile(
    State(state): State<SandboxState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<SellerProfile>>> {
    if payload.user_name.trim().is_empty() {
        return Err(AppError::BadRequest("userName is required".into()));
    }
    let mut store = state.store.write().await;
    let account = store
        .accounts
        .get_mut(&user.email)
        .ok_or(AppError::NotFound)?;
    let role = account.profile.role.clone();
    account.profile = SellerProfile {
        user_name: payload.user_name,
        user_email: payload.user_email,
        birthday: payload.birthday,
        contact_number: payload.contact_number,
        address: payload.address,
        role,
    };

    Ok(Json(ApiResponse::success(
        "Profile updated",
        account.profile.clone(),
        Some(Meta::empty()),
    )))
}

pub async fn deactivate(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Value>>> {
    let mut store = state.store.write().await;
    let account = store
        .accounts
        .get_mut(&user.email)
        .ok_or(AppError::NotFound)?;
    account.active = false;
    tracing::info!(seller = %user.email, "account deactivated");

    Ok(Json(ApiResponse::success(
        "Account deactivated",
        json!({}),
        Some(Meta::empty()),
    )))
}

pub async fn delete_account(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Value>>> {
    state
        .store
        .write()
        .await
        .accounts
        .remove(&user.email)
        .ok_or(AppError::NotFound)?;
    tracing::info!(seller = %user.email, "account deleted");

    Ok(Json(ApiResponse::success(
        "Account deleted",
        json!({}),
        Some(Meta::empty()),
    )))
}
