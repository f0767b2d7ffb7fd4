use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::models::profile::{Education, Experience, PopulatedProfile, Profile, Social};
use crate::models::user::{User, UserSummary};
use crate::profile::fields::ProfileFields;
use crate::store::{Store, StoreError, StoreResult};

const PROFILE_COLUMNS: &str = "p.id, p.user_id, p.company, p.website, p.location, p.bio, \
     p.status, p.githubusername, p.skills, p.social, p.experience, p.education, p.date";

/// Postgres-backed store. Profiles keep their social links and sub-record
/// sequences as JSONB documents.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    status: String,
    githubusername: Option<String>,
    skills: Vec<String>,
    social: Json<Social>,
    experience: Json<Vec<Experience>>,
    education: Json<Vec<Education>>,
    date: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            user: row.user_id,
            company: row.company,
            website: row.website,
            location: row.location,
            bio: row.bio,
            status: row.status,
            githubusername: row.githubusername,
            skills: row.skills,
            social: row.social.0,
            experience: row.experience.0,
            education: row.education.0,
            date: row.date,
        }
    }
}

#[derive(Debug, FromRow)]
struct PopulatedRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    owner_name: String,
    owner_avatar: Option<String>,
}

impl From<PopulatedRow> for PopulatedProfile {
    fn from(row: PopulatedRow) -> Self {
        let owner = UserSummary {
            id: row.profile.user_id,
            name: row.owner_name,
            avatar: row.owner_avatar,
        };
        Profile::from(row.profile).populate(owner)
    }
}

fn populated_query(filter: &str) -> String {
    format!(
        "SELECT {PROFILE_COLUMNS}, u.name AS owner_name, u.avatar AS owner_avatar \
         FROM profiles p JOIN users u ON u.id = p.user_id {filter}"
    )
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar, date FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar, date FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password, avatar, date) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.avatar)
        .bind(user.date)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate("email"),
            _ => StoreError::Database(e),
        })?;
        Ok(())
    }

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles p WHERE p.user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn find_populated_profile(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Option<PopulatedProfile>> {
        let row = sqlx::query_as::<_, PopulatedRow>(&populated_query("WHERE p.user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PopulatedProfile::from))
    }

    async fn list_populated_profiles(&self) -> StoreResult<Vec<PopulatedProfile>> {
        let rows = sqlx::query_as::<_, PopulatedRow>(&populated_query("ORDER BY p.date"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PopulatedProfile::from).collect())
    }

    async fn upsert_profile(&self, user_id: Uuid, fields: &ProfileFields) -> StoreResult<Profile> {
        // Absent fields keep the stored value; social is replaced whole.
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            INSERT INTO profiles AS p
                (id, user_id, company, website, location, bio, status, githubusername, skills, social)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, ''), $8, COALESCE($9, '{{}}'::text[]), $10)
            ON CONFLICT (user_id) DO UPDATE SET
                company = COALESCE($3, p.company),
                website = COALESCE($4, p.website),
                location = COALESCE($5, p.location),
                bio = COALESCE($6, p.bio),
                status = COALESCE($7, p.status),
                githubusername = COALESCE($8, p.githubusername),
                skills = COALESCE($9, p.skills),
                social = $10
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&fields.company)
        .bind(&fields.website)
        .bind(&fields.location)
        .bind(&fields.bio)
        .bind(&fields.status)
        .bind(&fields.githubusername)
        .bind(&fields.skills)
        .bind(Json(&fields.social))
        .fetch_one(&self.pool)
        .await?;

        debug!("Upserted profile {} for user {}", row.id, user_id);
        Ok(row.into())
    }

    async fn save_history(&self, profile: &Profile) -> StoreResult<()> {
        sqlx::query("UPDATE profiles SET experience = $2, education = $3 WHERE id = $1")
            .bind(profile.id)
            .bind(Json(&profile.experience))
            .bind(Json(&profile.education))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_account(&self, user_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
