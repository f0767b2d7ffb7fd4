use std::sync::Arc;

use crate::auth::password::CredentialsHasher;
use crate::auth::token::TokenKeys;
use crate::github::GithubClient;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: Arc<dyn CredentialsHasher>,
    pub tokens: TokenKeys,
    pub github: GithubClient,
}
