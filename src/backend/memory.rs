use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{Backend, BackendError};
use crate::models::{FamilySettings, Holiday, Kid, NewFamily, NewKid, User};

// Mirrors the unique constraint on family_settings.share_slug
const DUPLICATE_SLUG: &str =
    "duplicate key value violates unique constraint \"family_settings_share_slug_key\"";

// In-process stand-in for the hosted backend, for local runs and tests
#[derive(Default)]
pub struct MemoryBackend {
    sessions: DashMap<String, User>,
    families: DashMap<String, FamilySettings>, // keyed by share slug
    kids: DashMap<String, Kid>,
    holidays: DashMap<String, Vec<Holiday>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&self, token: &str, user: User) {
        self.sessions.insert(token.to_string(), user);
    }

    #[cfg(test)]
    pub fn holidays_for(&self, user_id: &str) -> Vec<Holiday> {
        self.holidays
            .get(user_id)
            .map(|h| h.value().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_user(&self, token: &str) -> Result<User, BackendError> {
        self.sessions
            .get(token)
            .map(|user| user.value().clone())
            .ok_or(BackendError::Unauthorized)
    }

    async fn find_family_by_slug(&self, _token: &str, slug: &str) -> Result<Option<FamilySettings>, BackendError> {
        Ok(self.families.get(slug).map(|f| f.value().clone()))
    }

    async fn find_family_by_user(&self, _token: &str, user_id: &str) -> Result<Option<FamilySettings>, BackendError> {
        Ok(self
            .families
            .iter()
            .find(|f| f.user_id == user_id)
            .map(|f| f.value().clone()))
    }

    async fn insert_family(&self, _token: &str, family: NewFamily) -> Result<FamilySettings, BackendError> {
        // the shard lock is held from the slug lookup to the insert
        match self.families.entry(family.share_slug.clone()) {
            Entry::Occupied(_) => Err(BackendError::Service(DUPLICATE_SLUG.to_string())),
            Entry::Vacant(slot) => {
                let row = FamilySettings {
                    id: Uuid::new_v4().to_string(),
                    user_id: family.user_id,
                    family_name: family.family_name,
                    share_slug: family.share_slug,
                    is_public: family.is_public,
                    created_at: Utc::now(),
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn insert_kid(&self, _token: &str, kid: NewKid) -> Result<Kid, BackendError> {
        let row = Kid {
            id: Uuid::new_v4().to_string(),
            parent_user_id: kid.parent_user_id,
            name: kid.name,
            birthday: kid.birthday,
            created_at: Utc::now(),
        };
        self.kids.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn insert_holidays(&self, _token: &str, holidays: &[Holiday]) -> Result<(), BackendError> {
        for holiday in holidays {
            self.holidays
                .entry(holiday.parent_user_id.clone())
                .or_default()
                .push(holiday.clone());
        }
        Ok(())
    }

    async fn list_kids(&self, _token: &str, user_id: &str) -> Result<Vec<Kid>, BackendError> {
        let mut kids: Vec<Kid> = self
            .kids
            .iter()
            .filter(|k| k.parent_user_id == user_id)
            .map(|k| k.value().clone())
            .collect();
        kids.sort_by_key(|k| k.created_at);
        Ok(kids)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn family(user_id: &str, slug: &str) -> NewFamily {
        NewFamily {
            user_id: user_id.to_string(),
            family_name: "Smiths".to_string(),
            share_slug: slug.to_string(),
            is_public: true,
        }
    }

    #[tokio::test]
    async fn unknown_tokens_are_rejected() {
        let backend = MemoryBackend::new();
        assert!(matches!(backend.get_user("nope").await, Err(BackendError::Unauthorized)));
    }

    #[tokio::test]
    async fn share_slugs_are_unique() {
        let backend = MemoryBackend::new();
        backend.insert_family("t", family("u1", "smiths")).await.unwrap();

        let err = backend.insert_family("t", family("u2", "smiths")).await.unwrap_err();
        assert!(err.to_string().contains("duplicate key"));

        let found = backend.find_family_by_slug("t", "smiths").await.unwrap().unwrap();
        assert_eq!(found.user_id, "u1");
        assert!(backend.find_family_by_user("t", "u2").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_claim_a_slug_once() {
        let backend = Arc::new(MemoryBackend::new());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let backend = backend.clone();
                tokio::spawn(async move { backend.insert_family("t", family(&format!("u{i}"), "smiths")).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(backend.families.len(), 1);
    }

    #[tokio::test]
    async fn kids_are_listed_per_parent() {
        let backend = MemoryBackend::new();
        for (parent, name) in [("u1", "Emma"), ("u2", "Noah"), ("u1", "Leo")] {
            backend
                .insert_kid(
                    "t",
                    NewKid {
                        parent_user_id: parent.to_string(),
                        name: name.to_string(),
                        birthday: None,
                    },
                )
                .await
                .unwrap();
        }

        let names: Vec<String> = backend
            .list_kids("t", "u1")
            .await
            .unwrap()
            .into_iter()
            .map(|k| k.name)
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Emma".to_string()));
        assert!(names.contains(&"Leo".to_string()));
    }
}
