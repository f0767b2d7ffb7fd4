use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub const TOKEN_HEADER: &str = "x-auth-token";

/// The authenticated caller. Extraction fails with 401 unless the request
/// carries a valid token for a user that still exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

fn token_from_parts(parts: &Parts) -> Option<&str> {
    if let Some(token) = parts
        .headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(token.trim());
    }
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingToken)?;

        let user_id = state.tokens.verify(token).map_err(|e| {
            debug!("Rejected token: {e}");
            AppError::InvalidToken
        })?;

        let user = state.store.find_user(user_id).await?.ok_or_else(|| {
            debug!("Token refers to missing user {user_id}");
            AppError::InvalidToken
        })?;

        Ok(AuthUser(user))
    }
}
