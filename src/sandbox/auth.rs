use axum::{extract::FromRequestParts, http::header};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{
    error::AppError,
    state::{Account, SandboxState},
};
use crate::dto::auth::Claims;

/// Seller resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub role: String,
}

pub fn issue_token(
    state: &SandboxState,
    account: &Account,
) -> Result<(String, DateTime<Utc>), AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: account.profile.user_email.clone(),
        role: account.profile.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok((format!("Bearer {token}"), expiration))
}

impl FromRequestParts<SandboxState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &SandboxState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        let store = state.store.read().await;
        let account = store
            .accounts
            .get(&decoded.claims.sub)
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
        if !account.active {
            return Err(AppError::Forbidden("Account is deactivated".into()));
        }

        Ok(AuthUser {
            email: decoded.claims.sub,
            role: decoded.claims.role,
        })
    }
}

pub fn ensure_seller(user: &AuthUser) -> Result<(), AppError> {
    if user.role != "seller" {
        return Err(AppError::Forbidden("Seller account required".into()));
    }
    Ok(())
}
