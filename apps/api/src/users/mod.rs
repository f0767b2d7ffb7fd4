use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::handlers::TokenResponse;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::store::StoreError;
use crate::validation::ValidJson;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[validate(length(
        min = 6,
        message = "Please enter a password with 6 or more characters"
    ))]
    pub password: String,
}

/// POST /api/users
/// Registers an account and signs the new user in.
pub async fn handle_register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    if state.store.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::UserExists);
    }

    let hash = state.hasher.hash_password(&req.password).await?;
    let user = User::new(req.name, req.email, hash);

    state.store.insert_user(&user).await.map_err(|e| match e {
        StoreError::Duplicate(_) => AppError::UserExists,
        other => AppError::Store(other),
    })?;

    let token = state.tokens.issue(user.id)?;
    info!("Registered user {}", user.id);
    Ok(Json(TokenResponse { token }))
}
