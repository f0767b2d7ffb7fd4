use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::profile::{PopulatedProfile, Profile};
use crate::models::user::{User, UserSummary};
use crate::profile::fields::ProfileFields;
use crate::store::{Store, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // insertion order stands in for `ORDER BY date`
    profiles: Vec<Profile>,
}

/// In-memory store used by the HTTP tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn profile_count(&self) -> usize {
        self.tables.lock().unwrap().profiles.len()
    }
}

/// Overwrites the fields present in `fields`, leaving the rest untouched.
/// Same rules as the Postgres upsert's `COALESCE` clauses.
fn apply_fields(fields: &ProfileFields, profile: &mut Profile) {
    fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
        if let Some(v) = value {
            *slot = v.clone();
        }
    }
    fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
        if value.is_some() {
            slot.clone_from(value);
        }
    }

    set_opt(&mut profile.company, &fields.company);
    set_opt(&mut profile.website, &fields.website);
    set_opt(&mut profile.location, &fields.location);
    set_opt(&mut profile.bio, &fields.bio);
    set(&mut profile.status, &fields.status);
    set_opt(&mut profile.githubusername, &fields.githubusername);
    set(&mut profile.skills, &fields.skills);
    profile.social = fields.social.clone();
}

fn new_profile(fields: &ProfileFields, user_id: Uuid) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        user: user_id,
        company: fields.company.clone(),
        website: fields.website.clone(),
        location: fields.location.clone(),
        bio: fields.bio.clone(),
        status: fields.status.clone().unwrap_or_default(),
        githubusername: fields.githubusername.clone(),
        skills: fields.skills.clone().unwrap_or_default(),
        social: fields.social.clone(),
        experience: Vec::new(),
        education: Vec::new(),
        date: Utc::now(),
    }
}

fn populate(tables: &Tables, profile: &Profile) -> Option<PopulatedProfile> {
    let owner = tables.users.get(&profile.user)?;
    Some(profile.clone().populate(UserSummary::from(owner)))
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.profiles.iter().find(|p| p.user == user_id).cloned())
    }

    async fn find_populated_profile(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Option<PopulatedProfile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .profiles
            .iter()
            .find(|p| p.user == user_id)
            .and_then(|p| populate(&tables, p)))
    }

    async fn list_populated_profiles(&self) -> StoreResult<Vec<PopulatedProfile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .profiles
            .iter()
            .filter_map(|p| populate(&tables, p))
            .collect())
    }

    async fn upsert_profile(&self, user_id: Uuid, fields: &ProfileFields) -> StoreResult<Profile> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables.profiles.iter_mut().find(|p| p.user == user_id) {
            apply_fields(fields, existing);
            return Ok(existing.clone());
        }
        let profile = new_profile(fields, user_id);
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn save_history(&self, profile: &Profile) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables.profiles.iter_mut().find(|p| p.id == profile.id) {
            existing.experience = profile.experience.clone();
            existing.education = profile.education.clone();
        }
        Ok(())
    }

    async fn delete_account(&self, user_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.profiles.retain(|p| p.user != user_id);
        tables.users.remove(&user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Social;

    #[tokio::test]
    async fn test_upsert_only_overwrites_present_fields() {
        let store = MemoryStore::default();
        let user_id = Uuid::new_v4();
        let created = ProfileFields {
            company: Some("Acme".to_string()),
            status: Some("Developer".to_string()),
            skills: Some(vec!["js".to_string(), "node".to_string()]),
            social: Social {
                linkedin: Some("https://linkedin.com/in/dev".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let first = store.upsert_profile(user_id, &created).await.unwrap();

        let update = ProfileFields {
            bio: Some("new bio".to_string()),
            status: Some("Senior Developer".to_string()),
            ..Default::default()
        };
        let profile = store.upsert_profile(user_id, &update).await.unwrap();

        assert_eq!(profile.id, first.id);
        assert_eq!(store.profile_count(), 1);
        assert_eq!(profile.company.as_deref(), Some("Acme"));
        assert_eq!(profile.bio.as_deref(), Some("new bio"));
        assert_eq!(profile.status, "Senior Developer");
        assert_eq!(profile.skills, vec!["js", "node"]);
        // social links are replaced wholesale by each update
        assert_eq!(profile.social, Social::default());
    }
}
