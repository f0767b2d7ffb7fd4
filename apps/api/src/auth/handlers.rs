use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::validation::ValidJson;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[validate(required(message = "Password required"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// GET /api/auth
pub async fn handle_current_user(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// POST /api/auth
/// Unknown email and wrong password produce the same response.
pub async fn handle_login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let password = req.password.unwrap_or_default();

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| {
            warn!("Login attempt with unknown email");
            AppError::InvalidCredentials
        })?;

    if !state.hasher.verify_password(&password, &user.password).await? {
        warn!("Invalid password for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    info!("User {} logged in", user.id);
    Ok(Json(TokenResponse { token }))
}
