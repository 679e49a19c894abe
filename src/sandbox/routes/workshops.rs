use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{delete, get},
};
use chrono::NaiveDate;
use serde_json::{Value, json};

use super::uploads::parse_multipart;
use crate::{
    dto::workshops::fields,
    models::{ResourceId, Workshop, WorkshopStatus},
    response::{ApiResponse, Meta},
    sandbox::{
        auth::{AuthUser, ensure_seller},
        error::{AppError, AppResult},
        state::SandboxState,
    },
};

pub fn router() -> Router<SandboxState> {
    Router::new()
        .route("/", get(list_workshops).post(create_workshop))
        .route("/{id}", delete(delete_workshop))
}

/// Bare array.
pub async fn list_workshops(
    State(state): State<SandboxState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Workshop>>> {
    ensure_seller(&user)?;
    Ok(Json(state.store.read().await.workshops.clone()))
}

pub async fn create_workshop(
    State(state): State<SandboxState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Workshop>>> {
    ensure_seller(&user)?;
    let upload = parse_multipart(multipart).await?;

    let title = upload
        .text(fields::TITLE)
        .ok_or_else(|| AppError::BadRequest("Title is required".into()))?
        .to_string();
    let date = upload
        .text(fields::DATE)
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .ok_or_else(|| AppError::BadRequest("date must be YYYY-MM-DD".into()))?;
    let max_participants = upload
        .text(fields::MAX_PARTICIPANTS)
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::BadRequest("max_participants must be at least 1".into()))?;
    let status = match upload.text(fields::STATUS) {
        Some(raw) => WorkshopStatus::parse(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown status `{raw}`")))?,
        None => WorkshopStatus::Upcoming,
    };

    let workshop = Workshop {
        id: Some(ResourceId::generate()),
        title,
        description: upload.text(fields::DESCRIPTION).map(str::to_string),
        location: upload.text(fields::LOCATION).map(str::to_string),
        date,
        time: upload.text(fields::TIME).map(str::to_string),
        max_participants,
        status,
        registration_link: upload.text(fields::REGISTRATION_LINK).map(str::to_string),
        image_url: upload.url_for(fields::IMAGE),
    };
    state.store.write().await.workshops.insert(0, workshop.clone());
    tracing::info!(seller = %user.email, title = %workshop.title, "workshop created");

    Ok(Json(ApiResponse::success(
        "Workshop created",
        workshop,
        Some(Meta::empty()),
    )))
}

pub async fn delete_workshop(
    State(state): State<SandboxState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    ensure_seller(&user)?;
    let id = ResourceId::new(id);
    let mut store = state.store.write().await;
    let before = store.workshops.len();
    store.workshops.retain(|w| w.id.as_ref() != Some(&id));
    if store.workshops.len() == before {
        return Err(AppError::NotFound);
    }

    Ok(Json(ApiResponse::success(
        "Workshop deleted",
        json!({}),
        Some(Meta::empty()),
    )))
}
