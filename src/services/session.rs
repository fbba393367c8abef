// src/services/session.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::auth::Principal;

pub type SessionId = Uuid;

/// Keyed storage of logged-in principals.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &SessionId) -> Option<Principal>;
    async fn set(&self, id: SessionId, principal: Principal);
    async fn destroy(&self, id: &SessionId);

    /// Drops every expired entry, returning how many were removed.
    async fn purge_expired(&self) -> usize;

    /// Stores the principal under a fresh random id.
    async fn create(&self, principal: Principal) -> SessionId {
        let id = Uuid::new_v4();
        self.set(id, principal).await;
        id
    }
}

struct Entry {
    principal: Principal,
    expires_at: DateTime<Utc>,
}

/// Process-local store; entries expire `ttl` after they were written.
pub struct InMemorySessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<SessionId, Entry>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Option<Principal> {
        {
            let entries = self.entries.read().await;
            match entries.get(id) {
                None => return None,
                Some(entry) if entry.expires_at > Utc::now() => return Some(entry.principal.clone()),
                Some(_) => {}
            }
        }

        // expired
        self.entries.write().await.remove(id);
        None
    }

    async fn set(&self, id: SessionId, principal: Principal) {
        let entry = Entry {
            principal,
            expires_at: Utc::now() + self.ttl,
        };
        self.entries.write().await.insert(id, entry);
    }

    async fn destroy(&self, id: &SessionId) {
        self.entries.write().await.remove(id);
    }

    async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::permissions::{PermissionMap, Role};

    fn principal() -> Principal {
        Principal {
            id: 1,
            name: "Admin User".into(),
            email: "admin@flourcrm.com".into(),
            role: Role::Admin,
            access_level: None,
            permissions: PermissionMap::default(),
        }
    }

    #[tokio::test]
    async fn test_create_get_destroy() {
        let store = InMemorySessionStore::new(Duration::hours(1));
        let id = store.create(principal()).await;

        assert_eq!(store.get(&id).await.map(|p| p.id), Some(1));

        store.destroy(&id).await;
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let store = InMemorySessionStore::new(Duration::hours(1));
        assert!(store.get(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_gone() {
        let store = InMemorySessionStore::new(Duration::seconds(-1));
        let id = store.create(principal()).await;

        assert!(store.get(&id).await.is_none());
        assert_eq!(store.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = InMemorySessionStore::new(Duration::seconds(-1));
        store.create(principal()).await;
        store.create(principal()).await;

        assert_eq!(store.purge_expired().await, 2);
    }
}
