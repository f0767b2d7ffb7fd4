use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::profile::{Education, Experience, PopulatedProfile, Profile};
use crate::profile::fields::{ProfileFields, ProfileRequest};
use crate::profile::history::{prepend, remove_by_id, EducationRequest, ExperienceRequest};
use crate::state::AppState;
use crate::validation::ValidJson;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

async fn own_profile(state: &AppState, user_id: Uuid) -> Result<Profile, AppError> {
    state
        .store
        .find_profile(user_id)
        .await?
        .ok_or(AppError::NoProfile)
}

/// GET /api/profile/me
pub async fn handle_my_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<PopulatedProfile>, AppError> {
    let profile = state
        .store
        .find_populated_profile(user.id)
        .await?
        .ok_or(AppError::NoProfile)?;
    Ok(Json(profile))
}

/// POST /api/profile
/// Creates the caller's profile, or updates the fields present in the body.
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let fields = ProfileFields::try_from(req).map_err(AppError::Validation)?;
    let profile = state.store.upsert_profile(user.id, &fields).await?;
    info!("Saved profile {} for user {}", profile.id, user.id);
    Ok(Json(profile))
}

/// GET /api/profile
pub async fn handle_list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<PopulatedProfile>>, AppError> {
    Ok(Json(state.store.list_populated_profiles().await?))
}

/// GET /api/profile/user/:user_id
/// A malformed id is a server error, a well-formed unknown id is a 400.
pub async fn handle_profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PopulatedProfile>, AppError> {
    let user_id = Uuid::parse_str(&user_id).map_err(|_| AppError::MalformedId(user_id))?;
    let profile = state
        .store
        .find_populated_profile(user_id)
        .await?
        .ok_or(AppError::NoProfile)?;
    Ok(Json(profile))
}

/// DELETE /api/profile
pub async fn handle_delete_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_account(user.id).await?;
    info!("Deleted user {} and their profile", user.id);
    Ok(Json(MessageResponse {
        msg: "User deleted".to_string(),
    }))
}

/// PUT /api/profile/experience
pub async fn handle_add_experience(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<ExperienceRequest>,
) -> Result<Json<Profile>, AppError> {
    let experience = Experience::try_from(req).map_err(AppError::Validation)?;
    let mut profile = own_profile(&state, user.id).await?;

    prepend(&mut profile.experience, experience);
    state.store.save_history(&profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/experience/:exp_id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let mut profile = own_profile(&state, user.id).await?;

    if remove_by_id(&mut profile.experience, &exp_id).is_some() {
        state.store.save_history(&profile).await?;
    } else {
        warn!("No experience {} on profile {}", exp_id, profile.id);
    }
    Ok(Json(profile))
}

/// PUT /api/profile/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<EducationRequest>,
) -> Result<Json<Profile>, AppError> {
    let education = Education::try_from(req).map_err(AppError::Validation)?;
    let mut profile = own_profile(&state, user.id).await?;

    prepend(&mut profile.education, education);
    state.store.save_history(&profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/education/:edu_id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let mut profile = own_profile(&state, user.id).await?;

    if remove_by_id(&mut profile.education, &edu_id).is_some() {
        state.store.save_history(&profile).await?;
    } else {
        warn!("No education {} on profile {}", edu_id, profile.id);
    }
    Ok(Json(profile))
}

/// GET /api/profile/github/:username
pub async fn handle_github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    let repos = state.github.latest_repos(&username).await.map_err(|e| {
        warn!("GitHub lookup for '{}' failed: {}", username, e);
        AppError::GithubNotFound
    })?;
    Ok(Json(repos))
}
