use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    response::{ApiResponse, Meta},
    sandbox::{
        auth::issue_token,
        error::{AppError, AppResult},
        state::SandboxState,
    },
};

pub fn router() -> Router<SandboxState> {
    Router::new().route("/login", post(login))
}

pub async fn login(
    State(state): State<SandboxState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let LoginRequest { email, password } = payload;
    let account = {
        let mut store = state.store.write().await;
        let account = store
            .accounts
            .get_mut(&email)
            .filter(|a| a.password == password)
            .ok_or_else(|| AppError::BadRequest("Invalid email or password".into()))?;
        // Signing in again reactivates a deactivated account.
        account.active = true;
        account.clone()
    };

    let (token, expires_at) = issue_token(&state, &account)?;
    tracing::info!(email = %email, "sandbox login");

    Ok(Json(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            expires_at: Some(expires_at),
        },
        Some(Meta::empty()),
    )))
}
