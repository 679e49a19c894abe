use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use rand::Rng;
use serde_json::{Value, json};

use crate::{
    dto::gateways::{OtpRequest, VerifyOtpRequest, VerifyOtpResponse},
    models::GatewayId,
    response::{ApiResponse, Meta},
    sandbox::{
        auth::{AuthUser, ensure_seller},
        error::{AppError, AppResult},
        state::SandboxState,
    },
    validation::is_valid_ph_mobile,
};

pub fn router() -> Router<SandboxState> {
    Router::new()
        .route("/{gateway}/otp", post(request_otp))
        .route("/{gateway}/verify", post(verify_otp))
}

fn parse_gateway(raw: &str) -> AppResult<GatewayId> {
    raw.parse().map_err(AppError::BadRequest)
}

/// Issues a code and logs it; nothing is sent to a real provider.
pub async fn request_otp(
    State(state): State<SandboxState>,
    user: AuthUser,
    Path(gateway): Path<String>,
    Json(payload): Json<OtpRequest>,
) -> AppResult<Json<ApiResponse<Value>>> {
    ensure_seller(&user)?;
    let gateway = parse_gateway(&gateway)?;
    if !is_valid_ph_mobile(&payload.phone) {
        return Err(AppError::BadRequest("Invalid mobile number".into()));
    }
    let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
    tracing::info!(%gateway, phone = %payload.phone, otp = %code, "sandbox otp issued");
    state
        .store
        .write()
        .await
        .pending_otps
        .insert((gateway, payload.phone), code);

    Ok(Json(ApiResponse::success(
        "OTP sent",
        json!({}),
        Some(Meta::empty()),
    )))
}

pub async fn verify_otp(
    State(state): State<SandboxState>,
    user: AuthUser,
    Path(gateway): Path<String>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<ApiResponse<VerifyOtpResponse>>> {
    ensure_seller(&user)?;
    let gateway = parse_gateway(&gateway)?;
    let mut store = state.store.write().await;
    let key = (gateway, payload.phone);
    let expected = store.pending_otps.get(&key).cloned();
    match expected {
        Some(expected) if expected == payload.otp => {
            store.pending_otps.remove(&key);
        }
        Some(_) => return Err(AppError::BadRequest("Incorrect OTP".into())),
        None => return Err(AppError::BadRequest("No OTP was requested for this number".into())),
    }

    Ok(Json(ApiResponse::success(
        "Gateway connected",
        VerifyOtpResponse { connected: true },
        Some(Meta::empty()),
    )))
}
