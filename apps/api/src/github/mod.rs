//! GitHub client: the upstream lookup behind `GET /api/profile/github/:username`.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("devhub-api/", env!("CARGO_PKG_VERSION"));
const REPO_LIMIT: &str = "5";
const REPO_SORT: &str = "created:asc";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("'{0}' is not a valid GitHub username")]
    InvalidUsername(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned status {0}")]
    Status(u16),
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl GithubClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self, GithubError> {
        Self::with_base_url(GITHUB_API_URL.to_string(), client_id, client_secret)
    }

    pub fn with_base_url(
        base_url: String,
        client_id: String,
        client_secret: String,
    ) -> Result<Self, GithubError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .user_agent(USER_AGENT)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        })
    }

    pub fn repos_url(&self, username: &str) -> String {
        format!("{}/users/{}/repos", self.base_url, username)
    }

    /// Fetches the five oldest public repositories of `username`. The body is
    /// passed through untouched.
    pub async fn latest_repos(&self, username: &str) -> Result<Value, GithubError> {
        if !is_valid_username(username) {
            return Err(GithubError::InvalidUsername(username.to_string()));
        }

        let response = self
            .client
            .get(self.repos_url(username))
            .query(&[
                ("per_page", REPO_LIMIT),
                ("sort", REPO_SORT),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GitHub returned {} for '{}': {}", status, username, body);
            return Err(GithubError::Status(status.as_u16()));
        }

        let repos: Value = response.json().await?;
        debug!("Fetched repositories for '{}'", username);
        Ok(repos)
    }
}

/// GitHub logins are ASCII alphanumerics and hyphens, at most 39 characters,
/// never starting or ending with a hyphen.
fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 39
        && !username.starts_with('-')
        && !username.ends_with('-')
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
