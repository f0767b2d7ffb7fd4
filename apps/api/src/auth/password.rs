use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Failed to hash password")]
    Hash,

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait CredentialsHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, HashError>;

    /// `Ok(false)` for a wrong password or an unreadable stored hash.
    async fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, HashError>;
}

/// Argon2id hasher. Work happens on the blocking pool.
#[derive(Default, Clone)]
pub struct ArgonHasher {
    hasher: Argon2<'static>,
}

#[async_trait]
impl CredentialsHasher for ArgonHasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        let password = password.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|_| HashError::Hash)
        })
        .await?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, HashError> {
        let password = password.to_owned();
        let hashed = hashed.to_owned();
        let hasher = self.hasher.clone();
        let matched = tokio::task::spawn_blocking(move || match PasswordHash::new(&hashed) {
            Ok(parsed) => hasher.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        })
        .await?;
        Ok(matched)
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> ArgonHasher {
    use argon2::{Algorithm, Params, Version};

    let params = Params::new(1024, 1, 1, None).expect("valid argon2 params");
    ArgonHasher {
        hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    }
}
