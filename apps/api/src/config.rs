use anyhow::{Context, Result};

/// Default token lifetime in seconds (a little over eleven years).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 360_000_000;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub github_client_id: String,
    pub github_secret: String,
    pub token_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            github_client_id: require_env("GITHUB_CLIENT_ID")?,
            github_secret: require_env("GITHUB_SECRET")?,
            token_ttl_secs: match std::env::var("TOKEN_TTL_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .context("TOKEN_TTL_SECS must be a whole number of seconds")?,
                Err(_) => DEFAULT_TOKEN_TTL_SECS,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
