use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Entry, EntryFilter, EntryRepository, StoreError, UserRepository};
use crate::models::{CreateUser, User, UserProfile};

/// Process-local entry store. Contents are lost on restart.
pub struct MemoryRepository<E> {
    entries: RwLock<HashMap<Uuid, E>>,
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self { entries: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl<E: Entry> EntryRepository<E> for MemoryRepository<E> {
    async fn list(&self, owner: Uuid, filter: &EntryFilter<E::Category>) -> Result<Vec<E>, StoreError> {
        let entries = self.entries.read().await;

        let mut matching: Vec<E> = entries
            .values()
            .filter(|entry| entry.owner() == owner)
            .filter(|entry| filter.range.contains(entry.date()))
            .filter(|entry| match filter.category {
                Some(category) => entry.category() == Some(category),
                None => true,
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.date().cmp(&a.date()));
        if let Some(limit) = filter.limit {
            matching.truncate(limit.max(0) as usize);
        }

        Ok(matching)
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<E>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&id).filter(|entry| entry.owner() == owner).cloned())
    }

    async fn insert(&self, entry: &E) -> Result<E, StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(entry.id(), entry.clone());
        Ok(entry.clone())
    }

    async fn replace(&self, entry: &E) -> Result<Option<E>, StoreError> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(&entry.id()) {
            Some(existing) if existing.owner() == entry.owner() => {
                *existing = entry.clone();
                Ok(Some(entry.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        let owned = entries.get(&id).map_or(false, |entry| entry.owner() == owner);
        if owned {
            entries.remove(&id);
        }
        Ok(owned)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: CreateUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }
        if users.values().any(|existing| existing.username == user.username) {
            return Err(StoreError::Duplicate("username".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            profile: user.profile,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn update_profile(&self, id: Uuid, profile: &UserProfile) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.profile = profile.clone();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}
