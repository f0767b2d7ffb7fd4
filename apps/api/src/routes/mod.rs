pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::profile::handlers as profile;
use crate::state::AppState;
use crate::users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/users", post(users::handle_register))
        // Auth
        .route(
            "/api/auth",
            get(auth::handle_current_user).post(auth::handle_login),
        )
        // Profile
        .route(
            "/api/profile",
            get(profile::handle_list_profiles)
                .post(profile::handle_upsert_profile)
                .delete(profile::handle_delete_account),
        )
        .route("/api/profile/me", get(profile::handle_my_profile))
        .route(
            "/api/profile/user/:user_id",
            get(profile::handle_profile_by_user),
        )
        .route(
            "/api/profile/experience",
            put(profile::handle_add_experience),
        )
        .route(
            "/api/profile/experience/:exp_id",
            delete(profile::handle_remove_experience),
        )
        .route("/api/profile/education", put(profile::handle_add_education))
        .route(
            "/api/profile/education/:edu_id",
            delete(profile::handle_remove_education),
        )
        .route(
            "/api/profile/github/:username",
            get(profile::handle_github_repos),
        )
        .with_state(state)
}
