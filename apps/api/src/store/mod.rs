//! Document store seam.
//!
//! Handlers only talk to [`Store`]; production runs on [`postgres::PgStore`],
//! HTTP tests run on the in-memory store.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::profile::{PopulatedProfile, Profile};
use crate::models::user::User;
use crate::profile::fields::ProfileFields;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Duplicate value for unique field '{0}'")]
    Duplicate(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Duplicate`] when the email is already taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    async fn find_populated_profile(&self, user_id: Uuid)
        -> StoreResult<Option<PopulatedProfile>>;

    async fn list_populated_profiles(&self) -> StoreResult<Vec<PopulatedProfile>>;

    /// Creates the owner's profile or overwrites the present fields of the
    /// existing one, atomically.
    async fn upsert_profile(&self, user_id: Uuid, fields: &ProfileFields) -> StoreResult<Profile>;

    /// Persists the experience and education sequences of `profile`.
    async fn save_history(&self, profile: &Profile) -> StoreResult<()>;

    /// Removes the user's profile and then the user.
    async fn delete_account(&self, user_id: Uuid) -> StoreResult<()>;
}
