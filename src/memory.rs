//! In-process store used by the test suite.
//!
//! All tables live behind one mutex, so each check-and-insert runs as a single
//! step the same way the database's unique indexes make it one. Lookups and
//! inserts yield to the runtime first so concurrent requests interleave
//! between them.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::AccountRepo;
use crate::auth::repo_types::{Token, User};
use crate::birds::{Bird, BirdRepo};
use crate::db::RepoError;
use crate::sightings::{repo_types::Sighting, SightingRepo};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tokens: Vec<Token>,
    birds: Vec<Bird>,
    sightings: Vec<Sighting>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Birds are reference data; tests seed them directly.
    pub fn add_bird(&self, name: &str) -> Bird {
        let bird = Bird {
            id: Uuid::new_v4(),
            name: name.to_string(),
            species: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().birds.push(bird.clone());
        bird
    }

    pub fn sighting_count(&self, user_id: Uuid) -> usize {
        self.lock()
            .sightings
            .iter()
            .filter(|s| s.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl AccountRepo for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, RepoError> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == email) {
            return Err(RepoError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_token(&self, user_id: Uuid, token: &str) -> Result<Token, RepoError> {
        let mut t = self.lock();
        if !t.users.iter().any(|u| u.id == user_id) {
            return Err(RepoError::MissingReference);
        }
        if t.tokens.iter().any(|k| k.token == token) {
            return Err(RepoError::Duplicate);
        }
        let token = Token {
            user_id,
            token: token.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.tokens.push(token.clone());
        Ok(token)
    }

    async fn find_user_by_token(&self, token: &str) -> anyhow::Result<Option<User>> {
        let t = self.lock();
        let user = t
            .tokens
            .iter()
            .find(|k| k.token == token)
            .and_then(|k| t.users.iter().find(|u| u.id == k.user_id))
            .cloned();
        Ok(user)
    }
}

#[async_trait]
impl BirdRepo for MemoryStore {
    async fn find_bird(&self, id: Uuid) -> anyhow::Result<Option<Bird>> {
        tokio::task::yield_now().await;
        Ok(self.lock().birds.iter().find(|b| b.id == id).cloned())
    }

    async fn list_birds(&self) -> anyhow::Result<Vec<Bird>> {
        let mut birds = self.lock().birds.clone();
        birds.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(birds)
    }
}

#[async_trait]
impl SightingRepo for MemoryStore {
    async fn insert_sighting(&self, user_id: Uuid, bird_id: Uuid) -> Result<Sighting, RepoError> {
        tokio::task::yield_now().await;
        let mut t = self.lock();
        if !t.users.iter().any(|u| u.id == user_id) || !t.birds.iter().any(|b| b.id == bird_id) {
            return Err(RepoError::MissingReference);
        }
        if t
            .sightings
            .iter()
            .any(|s| s.user_id == user_id && s.bird_id == bird_id)
        {
            return Err(RepoError::Duplicate);
        }
        let sighting = Sighting {
            id: Uuid::new_v4(),
            user_id,
            bird_id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.sightings.push(sighting.clone());
        Ok(sighting)
    }

    async fn find_sighting(&self, id: Uuid) -> anyhow::Result<Option<Sighting>> {
        tokio::task::yield_now().await;
        Ok(self.lock().sightings.iter().find(|s| s.id == id).cloned())
    }

    async fn delete_sighting(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.sightings.len();
        t.sightings.retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(t.sightings.len() < before)
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<(Sighting, Bird)>> {
        let t = self.lock();
        let mut rows: Vec<(Sighting, Bird)> = t
            .sightings
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                let bird = t.birds.iter().find(|b| b.id == s.bird_id)?;
                Some((s.clone(), bird.clone()))
            })
            .collect();
        rows.sort_by(|a, b| {
            b.0.created_at
                .cmp(&a.0.created_at)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_breaks_timestamp_ties_by_id() {
        let store = MemoryStore::new();
        let user = store.create_user("robin@example.com", "hash").await.unwrap();
        let bird = store.add_bird("Robin");
        let at = OffsetDateTime::UNIX_EPOCH;

        let mut ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            store.lock().sightings.push(Sighting {
                id: *id,
                user_id: user.id,
                bird_id: bird.id,
                created_at: at,
            });
        }

        let listed: Vec<Uuid> = store
            .list_for_user(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|(s, _)| s.id)
            .collect();
        ids.sort();
        assert_eq!(listed, ids);
    }
}
